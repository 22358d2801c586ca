//! Core geometric types

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners, in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box from its center and half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Check whether a point lies inside (or on) the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The corner furthest along `normal`
    pub fn positive_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.max, self.min)
    }

    /// The corner furthest against `normal`
    pub fn negative_vertex(&self, normal: Vec3) -> Vec3 {
        Vec3::select(normal.cmpge(Vec3::ZERO), self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_corners() {
        let aabb = Aabb::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_center_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(5.0, 0.0, 0.0), Vec3::new(2.0, -2.0, 2.0));
        assert_eq!(aabb.min, Vec3::new(3.0, -2.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(7.0, 2.0, 2.0));
        assert!(aabb.contains_point(Vec3::new(6.5, 1.0, -1.0)));
        assert!(!aabb.contains_point(Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn test_support_vertices() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let normal = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(aabb.positive_vertex(normal), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(aabb.negative_vertex(normal), Vec3::new(-1.0, 1.0, -1.0));
    }
}
