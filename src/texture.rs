//! Texture sampling: four kinds, nearest-neighbor only (spec component C6).

use crate::util::{Color, Vector3};

/// A decoded bitmap image, row-major, owned by the [`crate::scene::Scene`]
/// that references it. No sharing across scenes.
#[derive(Debug, Clone)]
pub struct BitmapImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl BitmapImage {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    #[inline]
    fn pixel(&self, row: u32, col: u32) -> Color {
        self.pixels[(row * self.width + col) as usize]
    }
}

#[derive(Debug, Clone)]
pub enum Texture {
    Albedo { color: Color },
    Edges { edge_color: Color, inner_color: Color, edge_width: f32 },
    Checker { color_a: Color, color_b: Color, square_size: f32 },
    Bitmap { image: BitmapImage },
}

impl Texture {
    /// Sample this texture at a hit's `uv` and barycentric `(u, v)`.
    pub fn sample(&self, uv: Vector3, barycentric: (f32, f32)) -> Color {
        match self {
            Texture::Albedo { color } => *color,
            Texture::Edges { edge_color, inner_color, edge_width } => {
                let (u, v) = barycentric;
                let w = 1.0 - u - v;
                if u <= *edge_width || v <= *edge_width || w <= *edge_width {
                    *edge_color
                } else {
                    *inner_color
                }
            }
            Texture::Checker { color_a, color_b, square_size } => {
                let row = (uv.x / square_size).floor() as i64;
                let col = (uv.y / square_size).floor() as i64;
                if (row + col) % 2 == 0 {
                    *color_a
                } else {
                    *color_b
                }
            }
            Texture::Bitmap { image } => {
                let raster_x = (uv.x * image.width as f32).floor() as i64;
                let raster_y = ((1.0 - uv.y) * image.height as f32).floor() as i64;
                let col = raster_x.rem_euclid(image.width as i64) as u32;
                let row = raster_y.rem_euclid(image.height as i64) as u32;
                image.pixel(row, col)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn albedo_ignores_uv_and_barycentric() {
        let tex = Texture::Albedo { color: Color::new(0.2, 0.4, 0.6) };
        assert_eq!(tex.sample(Vector3::ZERO, (0.1, 0.1)), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn edges_picks_edge_color_near_triangle_border() {
        let tex = Texture::Edges { edge_color: Color::ONE, inner_color: Color::ZERO, edge_width: 0.05 };
        assert_eq!(tex.sample(Vector3::ZERO, (0.01, 0.5)), Color::ONE);
        assert_eq!(tex.sample(Vector3::ZERO, (0.33, 0.33)), Color::ZERO);
    }

    #[test]
    fn checker_alternates_by_integer_square() {
        let tex = Texture::Checker { color_a: Color::ONE, color_b: Color::ZERO, square_size: 1.0 };
        assert_eq!(tex.sample(Vector3::new(0.5, 0.5, 0.0), (0.0, 0.0)), Color::ONE);
        assert_eq!(tex.sample(Vector3::new(1.5, 0.5, 0.0), (0.0, 0.0)), Color::ZERO);
    }

    #[test]
    fn bitmap_wraps_negative_uv_with_euclidean_modulo() {
        let image = BitmapImage::new(
            2,
            2,
            vec![Color::new(1.0, 0.0, 0.0), Color::new(0.0, 1.0, 0.0), Color::new(0.0, 0.0, 1.0), Color::new(1.0, 1.0, 1.0)],
        );
        let tex = Texture::Bitmap { image };
        // uv=(-0.25, 0.25): raster_x = floor(-0.5) = -1 -> wraps to col 1; raster_y = floor(1.5)=1 -> row 1
        let c = tex.sample(Vector3::new(-0.25, 0.25, 0.0), (0.0, 0.0));
        assert_eq!(c, Color::new(1.0, 1.0, 1.0));
    }
}
