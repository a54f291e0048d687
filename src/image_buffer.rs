//! Image buffer and PPM (P3) output.

use std::io::Write;

use crate::util::{Color, Result};

/// Linear-color pixel buffer, row-major, origin at the top-left.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Write `image` as a plain PPM (P3) file: header `P3\n<W> <H>\n<max>\n`,
/// then one `<r> <g> <b>` triple per pixel, tab-separated within a row and
/// newline-separated between rows. Components are clamped to `[0, max]`
/// after multiplying the linear color by `max` and truncating.
pub fn write_ppm<W: Write>(writer: &mut W, image: &Image, max: u32) -> Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "{max}")?;

    let max_f = max as f32;
    for y in 0..image.height {
        let mut row = String::new();
        for x in 0..image.width {
            let color = image.get(x, y);
            let r = (color.x * max_f).clamp(0.0, max_f) as u32;
            let g = (color.y * max_f).clamp(0.0, max_f) as u32;
            let b = (color.z * max_f).clamp(0.0, max_f) as u32;
            if x > 0 {
                row.push('\t');
            }
            row.push_str(&format!("{r} {g} {b}"));
        }
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vector3;

    #[test]
    fn write_ppm_emits_exact_p3_format() {
        let image = Image::new(2, 1, vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)]);
        let mut buf = Vec::new();
        write_ppm(&mut buf, &image, 255).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0\t0 255 0\n");
    }

    #[test]
    fn write_ppm_clamps_out_of_range_colors() {
        let image = Image::new(1, 1, vec![Vector3::new(2.0, -1.0, 0.5)]);
        let mut buf = Vec::new();
        write_ppm(&mut buf, &image, 255).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "P3\n1 1\n255\n255 0 127\n");
    }
}
