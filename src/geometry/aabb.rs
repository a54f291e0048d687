//! Axis-aligned bounding box.

use crate::util::Vector3;

/// Axis-aligned bounding box, represented as a min/max corner pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// An AABB that contains no points in space. Folding `union` over this
    /// starting value correctly computes the tight bound of a point set.
    pub fn vacuum() -> Self {
        Self {
            min: Vector3::splat(f32::INFINITY),
            max: Vector3::splat(f32::NEG_INFINITY),
        }
    }

    /// Grow this box to include a point.
    #[inline]
    pub fn union_point(&mut self, p: Vector3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow this box to include another box.
    #[inline]
    pub fn union_box(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Split this box in half along `axis` (0=x, 1=y, 2=z) at its midpoint.
    /// `left.max[axis] == right.min[axis] == midpoint`; the other extents
    /// are unchanged.
    pub fn split(&self, axis: usize) -> (Aabb, Aabb) {
        debug_assert!(axis < 3);
        let mid = (self.min[axis] + self.max[axis]) * 0.5;

        let mut left = *self;
        let mut right = *self;
        left.max[axis] = mid;
        right.min[axis] = mid;
        (left, right)
    }

    /// Separating-axis test: true if the two boxes overlap (touching counts
    /// as overlapping). Reflexive and symmetric.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for axis in 0..3 {
            if other.min[axis] > self.max[axis] || other.max[axis] < self.min[axis] {
                return false;
            }
        }
        true
    }

    /// Centroid of the box.
    #[inline]
    pub fn centroid(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }
}
