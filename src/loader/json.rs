//! JSON scene file parser, grounded field-for-field in the reference
//! implementation's scene reader.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::accel::AccelerationTree;
use crate::camera::{Camera, DEFAULT_FOV_DEGREES};
use crate::geometry::{TriangleFlags, Vertex};
use crate::light::Light;
use crate::material::{Material, DEFAULT_IOR};
use crate::mesh;
use crate::scene::{Scene, DEFAULT_BUCKET_SIZE};
use crate::texture::{BitmapImage, Texture};
use crate::util::{Color, Error, Matrix3, Result, Transform, Vector3};

/// A parsed scene plus the output image dimensions, which live in
/// `settings.image_settings` rather than on [`Scene`] itself.
pub struct LoadedScene {
    pub scene: Scene,
    pub width: u32,
    pub height: u32,
}

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value.get(key).ok_or_else(|| Error::scene(format!("missing field `{key}`")))
}

fn as_f32(value: &Value, context: &str) -> Result<f32> {
    value.as_f64().map(|v| v as f32).ok_or_else(|| Error::scene(format!("`{context}` is not a number")))
}

fn as_u32(value: &Value, context: &str) -> Result<u32> {
    value.as_u64().map(|v| v as u32).ok_or_else(|| Error::scene(format!("`{context}` is not an unsigned integer")))
}

fn as_bool(value: &Value, context: &str) -> Result<bool> {
    value.as_bool().ok_or_else(|| Error::scene(format!("`{context}` is not a boolean")))
}

fn as_str<'a>(value: &'a Value, context: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| Error::scene(format!("`{context}` is not a string")))
}

fn vector3_from_value(value: &Value, context: &str) -> Result<Vector3> {
    let arr = value.as_array().filter(|a| a.len() == 3).ok_or_else(|| Error::scene(format!("`{context}` is not a 3-element array")))?;
    Ok(Vector3::new(as_f32(&arr[0], context)?, as_f32(&arr[1], context)?, as_f32(&arr[2], context)?))
}

fn matrix3_from_value(value: &Value, context: &str) -> Result<Matrix3> {
    let arr = value.as_array().filter(|a| a.len() == 9).ok_or_else(|| Error::scene(format!("`{context}` is not a 9-element array")))?;
    let mut f = [0.0f32; 9];
    for (i, v) in arr.iter().enumerate() {
        f[i] = as_f32(v, context)?;
    }
    Ok(Matrix3::from_rows(
        Vector3::new(f[0], f[1], f[2]),
        Vector3::new(f[3], f[4], f[5]),
        Vector3::new(f[6], f[7], f[8]),
    ))
}

fn vector_array_from_value(value: &Value, context: &str) -> Result<Vec<Vector3>> {
    let arr = value.as_array().ok_or_else(|| Error::scene(format!("`{context}` is not an array")))?;
    if arr.len() % 3 != 0 {
        return Err(Error::scene(format!("`{context}` length is not a multiple of 3")));
    }
    let mut out = Vec::with_capacity(arr.len() / 3);
    for chunk in arr.chunks_exact(3) {
        out.push(Vector3::new(as_f32(&chunk[0], context)?, as_f32(&chunk[1], context)?, as_f32(&chunk[2], context)?));
    }
    Ok(out)
}

fn int_array_from_value(value: &Value, context: &str) -> Result<Vec<u32>> {
    let arr = value.as_array().ok_or_else(|| Error::scene(format!("`{context}` is not an array")))?;
    arr.iter().map(|v| as_u32(v, context)).collect()
}

struct ParsedTextures {
    textures: Vec<Texture>,
    index_by_name: HashMap<String, u32>,
}

fn parse_texture(value: &Value, asset_root: &Path) -> Result<Texture> {
    let kind = as_str(field(value, "type")?, "textures[].type")?;
    match kind {
        "albedo" => Ok(Texture::Albedo { color: vector3_from_value(field(value, "albedo")?, "textures[].albedo")? }),
        "edges" => Ok(Texture::Edges {
            edge_color: vector3_from_value(field(value, "edge_color")?, "textures[].edge_color")?,
            inner_color: vector3_from_value(field(value, "inner_color")?, "textures[].inner_color")?,
            edge_width: as_f32(field(value, "edge_width")?, "textures[].edge_width")?,
        }),
        "checker" => Ok(Texture::Checker {
            color_a: vector3_from_value(field(value, "color_A")?, "textures[].color_A")?,
            color_b: vector3_from_value(field(value, "color_B")?, "textures[].color_B")?,
            square_size: as_f32(field(value, "square_size")?, "textures[].square_size")?,
        }),
        "bitmap" => {
            let file_path = as_str(field(value, "file_path")?, "textures[].file_path")?;
            Ok(Texture::Bitmap { image: load_bitmap(&asset_root.join(file_path))? })
        }
        other => Err(Error::scene(format!("unknown texture type `{other}`"))),
    }
}

fn load_bitmap(path: &Path) -> Result<BitmapImage> {
    let decoded = image::open(path)?;
    if !matches!(decoded.color(), image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F) {
        return Err(Error::scene(format!("{}: bitmap texture must have exactly 3 channels", path.display())));
    }
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| Color::new(p[0] as f32 / 255.0, p[1] as f32 / 255.0, p[2] as f32 / 255.0)).collect();
    Ok(BitmapImage::new(width, height, pixels))
}

fn parse_textures(value: Option<&Value>, asset_root: &Path) -> Result<ParsedTextures> {
    let mut textures = Vec::new();
    let mut index_by_name = HashMap::new();
    if let Some(value) = value {
        let arr = value.as_array().ok_or_else(|| Error::scene("`textures` is not an array"))?;
        for entry in arr {
            let name = as_str(field(entry, "name")?, "textures[].name")?.to_owned();
            let index = textures.len() as u32;
            textures.push(parse_texture(entry, asset_root)?);
            index_by_name.insert(name, index);
        }
    }
    Ok(ParsedTextures { textures, index_by_name })
}

struct ParsedMaterials {
    materials: Vec<Material>,
    triangle_flags: Vec<TriangleFlags>,
}

fn parse_materials(value: &Value, parsed_textures: &mut ParsedTextures) -> Result<ParsedMaterials> {
    let arr = value.as_array().filter(|a| !a.is_empty()).ok_or_else(|| Error::scene("`materials` must be a non-empty array"))?;

    let mut materials = Vec::with_capacity(arr.len());
    let mut triangle_flags = Vec::with_capacity(arr.len());

    for entry in arr {
        let kind = as_str(field(entry, "type")?, "materials[].type")?;
        let smooth_shading = as_bool(field(entry, "smooth_shading")?, "materials[].smooth_shading")?;
        let back_face_culling = entry.get("back_face_culling").map(|v| as_bool(v, "materials[].back_face_culling")).transpose()?.unwrap_or(false);
        triangle_flags.push(TriangleFlags { smooth_shading, back_face_culling });

        let material = match kind {
            "refractive" => {
                let ior = entry.get("ior").map(|v| as_f32(v, "materials[].ior")).transpose()?.unwrap_or(DEFAULT_IOR);
                Material::Refractive { ior }
            }
            "diffuse" | "reflective" | "constant" => {
                let albedo_value = field(entry, "albedo")?;
                let albedo_texture = match albedo_value.as_str() {
                    Some(name) => *parsed_textures
                        .index_by_name
                        .get(name)
                        .ok_or_else(|| Error::scene(format!("material references unknown texture `{name}`")))?,
                    None => {
                        let index = parsed_textures.textures.len() as u32;
                        parsed_textures.textures.push(Texture::Albedo { color: vector3_from_value(albedo_value, "materials[].albedo")? });
                        index
                    }
                };
                match kind {
                    "diffuse" => Material::Diffuse { albedo_texture },
                    "reflective" => Material::Reflective { albedo_texture },
                    _ => Material::Constant { albedo_texture },
                }
            }
            other => return Err(Error::scene(format!("unknown material type `{other}`"))),
        };
        materials.push(material);
    }

    Ok(ParsedMaterials { materials, triangle_flags })
}

fn parse_objects(value: &Value, triangle_flags: &[TriangleFlags]) -> Result<(Vec<Vertex>, Vec<crate::geometry::Triangle>)> {
    let arr = value.as_array().ok_or_else(|| Error::scene("`objects` is not an array"))?;

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for entry in arr {
        let positions = vector_array_from_value(field(entry, "vertices")?, "objects[].vertices")?;
        let indices = int_array_from_value(field(entry, "triangles")?, "objects[].triangles")?;
        let material_index = as_u32(field(entry, "material_index")?, "objects[].material_index")?;
        let flags = *triangle_flags
            .get(material_index as usize)
            .ok_or_else(|| Error::scene(format!("material_index {material_index} out of range")))?;

        let uvs = match entry.get("uvs") {
            Some(v) => {
                let uvs = vector_array_from_value(v, "objects[].uvs")?;
                if uvs.len() != positions.len() {
                    return Err(Error::scene("objects[].uvs length does not match objects[].vertices length"));
                }
                uvs
            }
            None => Vec::new(),
        };

        let mesh_data = mesh::MeshData { positions: &positions, uvs: &uvs, indices: &indices, material_index, flags };
        mesh::add_mesh(&mut vertices, &mut triangles, &mesh_data)?;
    }

    mesh::finish_normals(&mut vertices);
    Ok((vertices, triangles))
}

fn parse_lights(value: &Value) -> Result<Vec<Light>> {
    let arr = value.as_array().ok_or_else(|| Error::scene("`lights` is not an array"))?;
    arr.iter()
        .map(|entry| {
            let intensity = as_f32(field(entry, "intensity")?, "lights[].intensity")?;
            let position = vector3_from_value(field(entry, "position")?, "lights[].position")?;
            Ok(Light::new(position, intensity))
        })
        .collect()
}

/// Load and fully assemble a scene from a JSON file. Any malformed or
/// semantically invalid field aborts the whole load; there is no partial
/// scene.
pub fn load_scene(path: &Path) -> Result<LoadedScene> {
    let text = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&text)?;
    let asset_root = path.parent().unwrap_or_else(|| Path::new("."));

    let settings = field(&doc, "settings")?;
    let background_color = vector3_from_value(field(settings, "background_color")?, "settings.background_color")?;

    let image_settings = field(settings, "image_settings")?;
    let width = as_u32(field(image_settings, "width")?, "settings.image_settings.width")?;
    let height = as_u32(field(image_settings, "height")?, "settings.image_settings.height")?;
    let bucket_size = image_settings.get("bucket_size").map(|v| as_u32(v, "settings.image_settings.bucket_size")).transpose()?.unwrap_or(DEFAULT_BUCKET_SIZE);

    let gi_on = settings.get("gi_on").map(|v| as_bool(v, "settings.gi_on")).transpose()?.unwrap_or(false);
    let reflections_on = settings.get("reflections_on").map(|v| as_bool(v, "settings.reflections_on")).transpose()?.unwrap_or(true);
    let refractions_on = settings.get("refractions_on").map(|v| as_bool(v, "settings.refractions_on")).transpose()?.unwrap_or(true);

    let camera_value = field(&doc, "camera")?;
    let position = vector3_from_value(field(camera_value, "position")?, "camera.position")?;
    let rotation = matrix3_from_value(field(camera_value, "matrix")?, "camera.matrix")?;
    let fov_degrees = camera_value.get("fov_degrees").map(|v| as_f32(v, "camera.fov_degrees")).transpose()?.unwrap_or(DEFAULT_FOV_DEGREES);
    let camera = Camera::new(Transform::new(position, rotation), fov_degrees);

    let mut parsed_textures = parse_textures(doc.get("textures"), asset_root)?;
    let parsed_materials = parse_materials(field(&doc, "materials")?, &mut parsed_textures)?;
    let (vertices, triangles) = parse_objects(field(&doc, "objects")?, &parsed_materials.triangle_flags)?;
    let lights = parse_lights(field(&doc, "lights")?)?;

    let tree = AccelerationTree::build(&triangles, &vertices);
    let scene = Scene {
        background_color,
        camera,
        vertices,
        triangles,
        tree,
        lights,
        textures: parsed_textures.textures,
        materials: parsed_materials.materials,
        bucket_size,
        gi_on,
        reflections_on,
        refractions_on,
    };

    Ok(LoadedScene { scene, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_scene_json() -> &'static str {
        r#"{
            "settings": {
                "background_color": [0.1, 0.2, 0.3],
                "image_settings": { "width": 4, "height": 4 }
            },
            "camera": {
                "position": [0, 0, 0],
                "matrix": [1,0,0, 0,1,0, 0,0,1]
            },
            "materials": [
                { "type": "diffuse", "smooth_shading": false, "albedo": [1,1,1] }
            ],
            "objects": [],
            "lights": []
        }"#
    }

    #[test]
    fn loads_a_minimal_scene() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", minimal_scene_json()).unwrap();
        let loaded = load_scene(file.path()).unwrap();
        assert_eq!(loaded.width, 4);
        assert_eq!(loaded.height, 4);
        assert_eq!(loaded.scene.background_color, Vector3::new(0.1, 0.2, 0.3));
        assert!(loaded.scene.reflections_on);
        assert!(loaded.scene.refractions_on);
        assert!(!loaded.scene.gi_on);
    }

    #[test]
    fn missing_settings_field_is_a_scene_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        assert!(load_scene(file.path()).is_err());
    }

    #[test]
    fn material_referencing_unknown_texture_name_errors() {
        let json = r#"{
            "settings": { "background_color": [0,0,0], "image_settings": { "width": 1, "height": 1 } },
            "camera": { "position": [0,0,0], "matrix": [1,0,0, 0,1,0, 0,0,1] },
            "materials": [ { "type": "diffuse", "smooth_shading": false, "albedo": "nonexistent" } ],
            "objects": [],
            "lights": []
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        assert!(load_scene(file.path()).is_err());
    }
}
