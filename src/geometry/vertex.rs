//! Per-vertex attributes.

use crate::util::Vector3;

/// A mesh vertex: position, smooth-shading normal (accumulated from
/// incident face normals, then normalized), and texture coordinates.
///
/// `uv` is stored as a [`Vector3`] with only `x`/`y` populated, matching
/// the reference implementation's "everything is a Vector" convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Vector3,
    pub uv: Vector3,
}

impl Vertex {
    pub fn new(position: Vector3, uv: Vector3) -> Self {
        Self { position, normal: Vector3::ZERO, uv }
    }
}
