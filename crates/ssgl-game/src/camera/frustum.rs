//! View frustum for culling
//!
//! Extracts the six clip planes from a view-projection matrix and tests
//! points, spheres and boxes against them.

use glam::{Mat4, Vec3, Vec4};
use ssgl_core::Aabb;

/// Result of classifying a box against the frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// Entirely outside
    Outside,
    /// Entirely inside
    Inside,
    /// Straddles at least one plane
    Partial,
}

/// A plane `normal · p + distance = 0`, normal pointing into the frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Build a plane from `(a, b, c, d)` coefficients, normalized
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                distance: coefficients.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from the plane; positive is inside
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// View frustum consisting of 6 planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far
    pub planes: [Plane; 6],
}

impl Frustum {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;

    /// Extract frustum planes from a view-projection matrix (Gribb/Hartmann).
    ///
    /// Expects a right-handed projection with a `[0, 1]` depth range, as
    /// produced by `Mat4::perspective_rh`.
    pub fn from_view_projection(vp: Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        Self {
            planes: [
                Plane::from_coefficients(row3 + row0),
                Plane::from_coefficients(row3 - row0),
                Plane::from_coefficients(row3 + row1),
                Plane::from_coefficients(row3 - row1),
                // [0,1] depth: near plane is just row2
                Plane::from_coefficients(row2),
                Plane::from_coefficients(row3 - row2),
            ],
        }
    }

    /// Test if a point is inside the frustum
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Test if a sphere intersects or is inside the frustum
    #[inline]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Test if a box intersects the frustum.
    ///
    /// Conservative: may report boxes near a frustum corner as visible,
    /// never misses a visible one.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(aabb.positive_vertex(plane.normal)) >= 0.0)
    }

    /// Classify a box as outside, inside, or straddling the frustum
    pub fn classify_aabb(&self, aabb: &Aabb) -> FrustumTest {
        let mut all_inside = true;

        for plane in &self.planes {
            if plane.distance_to_point(aabb.positive_vertex(plane.normal)) < 0.0 {
                return FrustumTest::Outside;
            }
            if plane.distance_to_point(aabb.negative_vertex(plane.normal)) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside {
            FrustumTest::Inside
        } else {
            FrustumTest::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(proj * view)
    }

    #[test]
    fn test_frustum_contains_origin() {
        let frustum = test_frustum();

        assert!(frustum.contains_point(Vec3::ZERO));
        // Behind the camera
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 20.0)));
        // Beyond the far plane
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn test_planes_are_normalized() {
        let frustum = test_frustum();
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }
        // Near plane faces down -Z from a camera at z = 10
        let near = frustum.planes[Frustum::NEAR];
        assert!((near.distance_to_point(Vec3::new(0.0, 0.0, 9.9))).abs() < 1e-3);
        assert!(near.normal.z < 0.0);
    }

    #[test]
    fn test_sphere_intersection() {
        let frustum = test_frustum();

        assert!(frustum.intersects_sphere(Vec3::ZERO, 1.0));
        assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 50.0), 1.0));
        // Center just behind the camera, but the radius reaches past the near plane
        assert!(frustum.intersects_sphere(Vec3::new(0.0, 0.0, 10.5), 1.0));
    }

    #[test]
    fn test_aabb_classification() {
        let frustum = test_frustum();

        let inside = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        assert!(frustum.intersects_aabb(&inside));
        assert_eq!(frustum.classify_aabb(&inside), FrustumTest::Inside);

        let outside = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 30.0), Vec3::splat(1.0));
        assert!(!frustum.intersects_aabb(&outside));
        assert_eq!(frustum.classify_aabb(&outside), FrustumTest::Outside);

        // Wide slab through the view volume crosses the side planes
        let straddling = Aabb::new(Vec3::new(-100.0, -0.5, -0.5), Vec3::new(100.0, 0.5, 0.5));
        assert!(frustum.intersects_aabb(&straddling));
        assert_eq!(frustum.classify_aabb(&straddling), FrustumTest::Partial);
    }
}
