//! Ray/AABB and ray/triangle intersection kernels, and acceleration-tree
//! traversal (spec component C4).

use smallvec::SmallVec;

use crate::accel::AccelerationTree;
use crate::geometry::{Aabb, Ray, Triangle, Vertex};
use crate::util::Vector3;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Result of a successful ray/scene intersection. Produced fresh on every
/// traversal; never stored.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub distance: f32,
    pub point: Vector3,
    pub normal: Vector3,
    pub uv: Vector3,
    pub barycentric: (f32, f32),
    pub material_index: u32,
}

fn other_two_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// "Enters the box" test: true as soon as any of the 6 slab planes is hit
/// within the box on the other two axes, with an origin-inside-box fix so a
/// ray starting inside `aabb` is never incorrectly reported as a miss.
pub fn ray_hits_aabb(ray: &Ray, aabb: &Aabb) -> bool {
    let origin = ray.origin;
    if origin.x >= aabb.min.x
        && origin.x <= aabb.max.x
        && origin.y >= aabb.min.y
        && origin.y <= aabb.max.y
        && origin.z >= aabb.min.z
        && origin.z <= aabb.max.z
    {
        return true;
    }

    for axis in 0..3 {
        let dir_component = ray.direction[axis];
        if dir_component.abs() < PARALLEL_EPSILON {
            continue;
        }
        let (a1, a2) = other_two_axes(axis);
        for &plane in &[aabb.min[axis], aabb.max[axis]] {
            let t = (plane - origin[axis]) / dir_component;
            if t < 0.0 {
                continue;
            }
            let p = ray.at(t);
            if p[a1] >= aabb.min[a1] && p[a1] <= aabb.max[a1] && p[a2] >= aabb.min[a2] && p[a2] <= aabb.max[a2] {
                return true;
            }
        }
    }
    false
}

/// Plane+edge ray/triangle test. Edge tests use `>= 0.0` (inclusive) so
/// triangle-edge pixels are never dropped.
pub fn ray_intersect_triangle(ray: &Ray, triangle: &Triangle, vertices: &[Vertex]) -> Option<Intersection> {
    let n = triangle.face_normal;
    let dn = ray.direction.dot(n);
    if dn.abs() < PARALLEL_EPSILON {
        return None;
    }

    let (v0, v1, v2) = triangle.vertices(vertices);
    let s = n.dot(v0.position - ray.origin);
    if triangle.flags.back_face_culling && s >= 0.0 {
        return None;
    }

    let t = s / dn;
    if t < 0.0 {
        return None;
    }

    let p = ray.at(t);
    let (e0, e1, e2) = triangle.edges(vertices);
    if n.dot(e0.cross(p - v0.position)) < 0.0 {
        return None;
    }
    if n.dot(e1.cross(p - v1.position)) < 0.0 {
        return None;
    }
    if n.dot(e2.cross(p - v2.position)) < 0.0 {
        return None;
    }

    let v0v1 = v1.position - v0.position;
    let v0v2 = v2.position - v0.position;
    let v0p = p - v0.position;
    let area = v0v1.cross(v0v2).length();
    let u = v0p.cross(v0v2).length() / area;
    let v = v0v1.cross(v0p).length() / area;
    let w = 1.0 - u - v;

    let normal = if triangle.flags.smooth_shading {
        (v1.normal * u + v2.normal * v + v0.normal * w).normalize()
    } else {
        n
    };
    let uv = v1.uv * u + v2.uv * v + v0.uv * w;

    Some(Intersection { distance: t, point: p, normal, uv, barycentric: (u, v), material_index: triangle.material_index })
}

/// Walk the tree depth-first via a fixed-capacity stack (bounded by the
/// tree's maximum depth), returning the nearest hit over every triangle in
/// every intersected leaf. Not front-to-back ordered; correctness does not
/// depend on visiting order.
pub fn traverse(ray: &Ray, tree: &AccelerationTree, triangles: &[Triangle], vertices: &[Vertex]) -> Option<Intersection> {
    let mut stack: SmallVec<[u32; 40]> = SmallVec::new();
    stack.push(0);
    let mut nearest: Option<Intersection> = None;

    while let Some(node_idx) = stack.pop() {
        let node = &tree.nodes[node_idx as usize];
        if !ray_hits_aabb(ray, &node.bounds) {
            continue;
        }
        if node.is_leaf() {
            for &ti in &node.triangles {
                if let Some(hit) = ray_intersect_triangle(ray, &triangles[ti as usize], vertices) {
                    if nearest.as_ref().map_or(true, |n| hit.distance < n.distance) {
                        nearest = Some(hit);
                    }
                }
            }
        } else {
            if let Some(c0) = node.child0 {
                stack.push(c0);
            }
            if let Some(c1) = node.child1 {
                stack.push(c1);
            }
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TriangleFlags;

    fn unit_box() -> Aabb {
        Aabb { min: Vector3::splat(-1.0), max: Vector3::splat(1.0) }
    }

    #[test]
    fn ray_hits_aabb_from_outside() {
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::X);
        assert!(ray_hits_aabb(&ray, &unit_box()));
    }

    #[test]
    fn ray_misses_aabb_pointed_away() {
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), -Vector3::X);
        assert!(!ray_hits_aabb(&ray, &unit_box()));
    }

    #[test]
    fn ray_hits_aabb_when_origin_is_inside() {
        let ray = Ray::new(Vector3::ZERO, Vector3::X);
        assert!(ray_hits_aabb(&ray, &unit_box()));
    }

    fn front_facing_triangle() -> (Vec<Vertex>, Triangle) {
        let vertices = vec![
            Vertex::new(Vector3::new(-1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(0.0, 1.0, -3.0), Vector3::ZERO),
        ];
        let tri = Triangle::new(&vertices, 0, 1, 2, 0, TriangleFlags::default());
        (vertices, tri)
    }

    #[test]
    fn ray_intersect_triangle_hits_center() {
        let (vertices, tri) = front_facing_triangle();
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        let hit = ray_intersect_triangle(&ray, &tri, &vertices).expect("expected hit");
        assert!((hit.distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn ray_intersect_triangle_misses_outside_silhouette() {
        let (vertices, tri) = front_facing_triangle();
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, -5.0, -3.0).normalize());
        assert!(ray_intersect_triangle(&ray, &tri, &vertices).is_none());
    }

    #[test]
    fn back_face_culling_rejects_hit_from_behind() {
        let vertices = vec![
            Vertex::new(Vector3::new(-1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(0.0, 1.0, -3.0), Vector3::ZERO),
        ];
        let flags = TriangleFlags { smooth_shading: false, back_face_culling: true };
        let tri = Triangle::new(&vertices, 0, 1, 2, 0, flags);
        // Ray from behind the triangle (+Z side), looking further +Z.
        let ray = Ray::new(Vector3::new(0.0, 0.0, -6.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(ray_intersect_triangle(&ray, &tri, &vertices).is_none());
    }

    #[test]
    fn traverse_finds_nearest_of_two_stacked_triangles() {
        let vertices = vec![
            Vertex::new(Vector3::new(-1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(1.0, -1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(0.0, 1.0, -3.0), Vector3::ZERO),
            Vertex::new(Vector3::new(-1.0, -1.0, -6.0), Vector3::ZERO),
            Vertex::new(Vector3::new(1.0, -1.0, -6.0), Vector3::ZERO),
            Vertex::new(Vector3::new(0.0, 1.0, -6.0), Vector3::ZERO),
        ];
        let triangles = vec![
            Triangle::new(&vertices, 3, 4, 5, 1, TriangleFlags::default()),
            Triangle::new(&vertices, 0, 1, 2, 0, TriangleFlags::default()),
        ];
        let tree = crate::accel::AccelerationTree::build(&triangles, &vertices);
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        let hit = traverse(&ray, &tree, &triangles, &vertices).expect("expected hit");
        assert_eq!(hit.material_index, 0);
        assert!((hit.distance - 3.0).abs() < 1e-4);
    }
}
