//! # pathtracer
//!
//! Offline CPU path tracer: triangles are assembled into an alternating-axis
//! acceleration tree, traced with recursive diffuse/reflective/refractive
//! shading, and scheduled across threads in fixed-size buckets.
//!
//! ## Modules
//!
//! - [`util`] - math types, error handling
//! - [`geometry`] - rays, AABBs, vertices, triangles
//! - [`mesh`] - assembling meshes into the shared vertex/triangle arrays
//! - [`accel`] - the acceleration tree builder
//! - [`intersect`] - ray/AABB, ray/triangle and tree traversal
//! - [`camera`] - primary ray generation and rig controls
//! - [`texture`] / [`material`] / [`light`] - shading inputs
//! - [`rng`] - the PCG32 per-pixel sampler
//! - [`shading`] - the recursive shading integrator
//! - [`scene`] - the assembled, renderable scene
//! - [`render`] - render settings and the tiled bucket scheduler
//! - [`image_buffer`] - the output pixel buffer and PPM writer
//! - [`loader`] - JSON scene file parsing
//!
//! ## Example
//!
//! ```ignore
//! use pathtracer::loader::load_scene;
//! use pathtracer::render::{render_image, RendererSettings};
//!
//! let loaded = load_scene("scene.json".as_ref())?;
//! let image = render_image(&loaded.scene, &RendererSettings::default(), loaded.width, loaded.height);
//! ```

pub mod accel;
pub mod camera;
pub mod geometry;
pub mod image_buffer;
pub mod intersect;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod render;
pub mod rng;
pub mod scene;
pub mod shading;
pub mod texture;
pub mod util;

pub use scene::Scene;
pub use util::{Error, Result};
