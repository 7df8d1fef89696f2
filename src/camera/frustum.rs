//! View frustum for visibility tests.
//!
//! Planes are extracted from the combined view-projection matrix with the
//! Gribb/Hartmann method for the OpenGL `[-1, 1]` depth range the camera
//! uses. Every plane points inward.

use glam::{Mat4, Vec3, Vec4};

use super::core::Camera;

/// A plane `normal · p + distance = 0` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub distance: f32,
}

impl Plane {
    /// Normalized plane from `(a, b, c, d)` coefficients. A zero normal
    /// yields a degenerate plane that accepts every point.
    #[must_use]
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

    /// Signed distance from the plane (positive = inside).
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Which side of the frustum a plane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumSide {
    /// Left clipping plane.
    Left = 0,
    /// Right clipping plane.
    Right = 1,
    /// Bottom clipping plane.
    Bottom = 2,
    /// Top clipping plane.
    Top = 3,
    /// Near clipping plane.
    Near = 4,
    /// Far clipping plane.
    Far = 5,
}

/// Six inward-facing clipping planes.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Planes indexed by [`FrustumSide`].
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the planes of `projection × view`.
    #[must_use]
    pub fn from_view_projection(vp: Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));
        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Plane bounding the given side.
    #[must_use]
    pub fn plane(&self, side: FrustumSide) -> &Plane {
        &self.planes[side as usize]
    }

    /// Whether the point lies inside all six planes.
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Whether any part of the sphere can be inside the frustum.
    #[inline]
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Whether the whole sphere is inside the frustum.
    #[inline]
    #[must_use]
    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= radius)
    }
}

impl Camera {
    /// Current view frustum.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection_matrix())
    }

    /// Whether a world point is inside the view frustum.
    #[must_use]
    pub fn is_point_visible(&self, point: Vec3) -> bool {
        self.frustum().contains_point(point)
    }

    /// Whether any part of a world sphere is inside the view frustum.
    #[must_use]
    pub fn sphere_is_visible(&self, center: Vec3, radius: f32) -> bool {
        self.frustum().intersects_sphere(center, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sees_scene() {
        let camera = Camera::new();
        assert!(camera.is_point_visible(Vec3::ZERO));
        assert!(camera.sphere_is_visible(Vec3::ZERO, 1.0));
        // Behind the eye.
        assert!(!camera.is_point_visible(camera.position() * 2.0));
    }

    #[test]
    fn near_and_far_planes_follow_clip_distances() {
        let camera = Camera::new();
        let frustum = camera.frustum();
        let eye = camera.position();
        let near = frustum.plane(FrustumSide::Near);
        let far = frustum.plane(FrustumSide::Far);
        assert!((-near.distance_to_point(eye) - camera.z_near()).abs() < 1e-3);
        assert!((far.distance_to_point(eye) - camera.z_far()).abs() < 1e-2);
    }

    #[test]
    fn sphere_off_to_the_side_is_culled() {
        let camera = Camera::new();
        assert!(!camera.sphere_is_visible(Vec3::new(50.0, 0.0, 0.0), 1.0));
        assert!(camera.sphere_is_visible(Vec3::new(1.5, 0.0, 0.0), 1.0));
    }
}
