//! Scene: owns every renderable resource (spec §3 Data model).

use crate::accel::AccelerationTree;
use crate::camera::Camera;
use crate::geometry::{Triangle, Vertex};
use crate::light::Light;
use crate::material::Material;
use crate::texture::Texture;
use crate::util::Color;

/// Default bucket edge length, in pixels, used when the scene file omits one.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// A fully assembled scene, ready to render. Built once, read-only
/// thereafter — the bucket scheduler shares `&Scene` across worker threads.
pub struct Scene {
    pub background_color: Color,
    pub camera: Camera,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub tree: AccelerationTree,
    pub lights: Vec<Light>,
    pub textures: Vec<Texture>,
    pub materials: Vec<Material>,
    pub bucket_size: u32,
    pub gi_on: bool,
    pub reflections_on: bool,
    pub refractions_on: bool,
}

impl Scene {
    /// Build the acceleration tree over `triangles`/`vertices` and assemble
    /// the remaining fields into a `Scene`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        background_color: Color,
        camera: Camera,
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        lights: Vec<Light>,
        textures: Vec<Texture>,
        materials: Vec<Material>,
        bucket_size: u32,
        gi_on: bool,
        reflections_on: bool,
        refractions_on: bool,
    ) -> Self {
        let tree = AccelerationTree::build(&triangles, &vertices);
        Self {
            background_color,
            camera,
            vertices,
            triangles,
            tree,
            lights,
            textures,
            materials,
            bucket_size,
            gi_on,
            reflections_on,
            refractions_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vector3;

    #[test]
    fn empty_scene_builds_a_single_leaf_tree() {
        let scene = Scene::new(
            Color::new(1.0, 0.0, 0.0),
            Camera::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            DEFAULT_BUCKET_SIZE,
            false,
            false,
            false,
        );
        assert_eq!(scene.tree.nodes.len(), 1);
        assert_eq!(scene.background_color, Vector3::new(1.0, 0.0, 0.0));
    }
}
