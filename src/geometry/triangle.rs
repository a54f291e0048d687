//! Triangles, indexing into the scene's flat vertex array.
//!
//! Triangles reference vertices by index rather than by pointer/reference:
//! the source this renderer is modeled on stores triangles as raw pointers
//! into a vector whose capacity must be reserved up front, which makes
//! reference stability a precondition of mesh assembly. Indices remove that
//! precondition and are equally cheap to dereference.

use super::vertex::Vertex;
use crate::util::Vector3;

/// Per-triangle rendering flags, derived from the owning material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriangleFlags {
    pub smooth_shading: bool,
    pub back_face_culling: bool,
}

/// A triangle over three vertices of the scene's vertex array, in CCW
/// winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
    /// `normalize((v1 - v0) x (v2 - v0))`, precomputed at construction.
    pub face_normal: Vector3,
    pub material_index: u32,
    pub flags: TriangleFlags,
}

impl Triangle {
    pub fn new(
        vertices: &[Vertex],
        v0: u32,
        v1: u32,
        v2: u32,
        material_index: u32,
        flags: TriangleFlags,
    ) -> Self {
        let p0 = vertices[v0 as usize].position;
        let p1 = vertices[v1 as usize].position;
        let p2 = vertices[v2 as usize].position;
        let face_normal = (p1 - p0).cross(p2 - p0).normalize();
        Self { v0, v1, v2, face_normal, material_index, flags }
    }

    /// The three vertices, dereferenced from `vertices`.
    #[inline]
    pub fn vertices<'a>(&self, vertices: &'a [Vertex]) -> (&'a Vertex, &'a Vertex, &'a Vertex) {
        (
            &vertices[self.v0 as usize],
            &vertices[self.v1 as usize],
            &vertices[self.v2 as usize],
        )
    }

    /// Edges `e0 = v1-v0`, `e1 = v2-v1`, `e2 = v0-v2`.
    #[inline]
    pub fn edges(&self, vertices: &[Vertex]) -> (Vector3, Vector3, Vector3) {
        let (v0, v1, v2) = self.vertices(vertices);
        (v1.position - v0.position, v2.position - v1.position, v0.position - v2.position)
    }

    /// Axis-aligned bounding box of this triangle.
    pub fn aabb(&self, vertices: &[Vertex]) -> super::Aabb {
        let (v0, v1, v2) = self.vertices(vertices);
        let mut b = super::Aabb::vacuum();
        b.union_point(v0.position);
        b.union_point(v1.position);
        b.union_point(v2.position);
        b
    }
}
