//! Vector and quaternion helpers on top of `glam`.
//!
//! `glam` provides the value types; this module adds the handful of
//! constructions the camera and manipulators need that `glam` either lacks
//! or leaves unguarded (degenerate axes, zero-length vectors).

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Squared-length threshold below which an axis is treated as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-8;

/// Extra quaternion constructions and queries.
pub trait QuatExt: Sized {
    /// Rotation of `angle` radians around `axis`.
    ///
    /// The axis does not need to be normalized. A near-zero axis yields the
    /// identity instead of dividing by zero.
    fn from_axis_angle_checked(axis: Vec3, angle: f32) -> Self;

    /// Shortest-arc rotation that maps `from` onto `to`.
    ///
    /// Zero-length input yields the identity.
    fn from_two_vectors(from: Vec3, to: Vec3) -> Self;

    /// Rotation whose local X, Y and Z axes map to the given world axes.
    ///
    /// The three vectors are assumed orthogonal; they are normalized here.
    fn from_rotated_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self;

    /// Apply the inverse rotation to `v`.
    fn inverse_rotate(&self, v: Vec3) -> Vec3;

    /// Unit axis and angle in `[0, π]`. Identity gives `(Vec3::X, 0.0)`.
    fn axis_angle(&self) -> (Vec3, f32);
}

impl QuatExt for Quat {
    fn from_axis_angle_checked(axis: Vec3, angle: f32) -> Self {
        let len_sq = axis.length_squared();
        if len_sq < DEGENERATE_EPSILON {
            return Quat::IDENTITY;
        }
        Quat::from_axis_angle(axis / len_sq.sqrt(), angle)
    }

    fn from_two_vectors(from: Vec3, to: Vec3) -> Self {
        if from.length_squared() < DEGENERATE_EPSILON
            || to.length_squared() < DEGENERATE_EPSILON
        {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(from.normalize(), to.normalize())
    }

    fn from_rotated_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        let basis = Mat3::from_cols(
            x_axis.normalize_or_zero(),
            y_axis.normalize_or_zero(),
            z_axis.normalize_or_zero(),
        );
        Quat::from_mat3(&basis).normalize()
    }

    #[inline]
    fn inverse_rotate(&self, v: Vec3) -> Vec3 {
        self.conjugate() * v
    }

    fn axis_angle(&self) -> (Vec3, f32) {
        // Canonical hemisphere keeps the angle in [0, π].
        let q = if self.w < 0.0 { -*self } else { *self };
        let imaginary = Vec3::new(q.x, q.y, q.z);
        let sin_half = imaginary.length();
        if sin_half < DEGENERATE_EPSILON {
            return (Vec3::X, 0.0);
        }
        (imaginary / sin_half, 2.0 * sin_half.atan2(q.w))
    }
}

/// Spherical interpolation along the shorter great-circle arc.
#[must_use]
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}
