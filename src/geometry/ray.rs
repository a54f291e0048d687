//! Rays and their reflection/refraction helpers.

use crate::util::{Vector3, Vector3Ext};

/// A ray: origin, (assumed unit-length) direction, and a recursion depth
/// counter used to terminate the shading recursion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
    pub depth: u32,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction, depth: 0 }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Build a reflection ray leaving `point` (a point on `self`) about
    /// `normal`, offset by `bias` along the normal to avoid immediate
    /// self-intersection.
    pub fn reflected_at(&self, point: Vector3, normal: Vector3, bias: f32) -> Ray {
        Ray {
            origin: point + normal * bias,
            direction: self.direction.reflect(normal),
            depth: self.depth + 1,
        }
    }

    /// Attempt to refract `self` through `point`/`normal`, offsetting the
    /// new origin to the other side of the surface. Returns `None` under
    /// total internal reflection, leaving `self` untouched.
    pub fn refracted_at(
        &self,
        point: Vector3,
        normal: Vector3,
        outside_ior: f32,
        inside_ior: f32,
        bias: f32,
    ) -> Option<Ray> {
        let direction = self.direction.refract(normal, outside_ior, inside_ior)?;
        Some(Ray {
            origin: point - normal * bias,
            direction,
            depth: self.depth + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_follows_the_parametric_line() {
        let r = Ray::new(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(r.at(3.0), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn reflected_at_increments_depth() {
        let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, -1.0, 0.0));
        let refl = r.reflected_at(Vector3::ZERO, Vector3::new(0.0, 1.0, 0.0), 1e-3);
        assert_eq!(refl.depth, 1);
        assert!((refl.direction - Vector3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }
}
