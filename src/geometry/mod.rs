//! Geometry primitives: axis-aligned bounding boxes, rays, vertices and
//! triangles (spec.md component C1).

mod aabb;
mod ray;
mod triangle;
mod vertex;

pub use aabb::Aabb;
pub use ray::Ray;
pub use triangle::{Triangle, TriangleFlags};
pub use vertex::Vertex;
