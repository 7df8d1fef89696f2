//! Screen-space rotation helpers shared by camera and object manipulation.
//!
//! The arcball is the "deformed" variant: inside a disc the pointer lifts
//! onto a unit sphere, outside it onto a hyperbolic sheet that meets the
//! sphere with matching height at the boundary. Rotations therefore never
//! jump when the cursor leaves the ball.

use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};

use crate::math::QuatExt;

/// Squared radius at which the sphere hands over to the hyperbola.
pub const BALL_SIZE_LIMIT: f32 = 0.5;

/// Height of the deformed ball above the normalized point `(x, y)`.
#[must_use]
pub fn project_on_ball(x: f32, y: f32) -> f32 {
    let d = x * x + y * y;
    if d < BALL_SIZE_LIMIT {
        (1.0 - d).sqrt()
    } else {
        BALL_SIZE_LIMIT / d.sqrt()
    }
}

/// Normalized ball point for a pixel. Y is flipped so up is positive.
fn ball_point(pixel: Vec2, center: Vec2, screen: Vec2, sensitivity: f32) -> Vec3 {
    let x = sensitivity * (pixel.x - center.x) / screen.x;
    let y = sensitivity * (center.y - pixel.y) / screen.y;
    Vec3::new(x, y, project_on_ball(x, y))
}

/// Arcball rotation for a drag from `previous` to `current` around the
/// pixel `center`, in camera coordinates.
///
/// The result moves the *camera* so the scene appears to follow the
/// cursor. An object under the cursor needs the inverse axis.
#[must_use]
pub fn deformed_ball_quaternion(
    previous: Vec2,
    current: Vec2,
    center: Vec2,
    screen: Vec2,
    sensitivity: f32,
) -> Quat {
    let p1 = ball_point(previous, center, screen, sensitivity);
    let p2 = ball_point(current, center, screen, sensitivity);
    let axis = p2.cross(p1);
    let sin = (axis.length_squared() / p1.length_squared() / p2.length_squared())
        .sqrt()
        .min(1.0);
    Quat::from_axis_angle_checked(axis, 2.0 * sin.asin())
}

/// Turntable angles `(horizontal, vertical)` for a pixel delta: half a
/// turn per screen width or height.
#[must_use]
pub fn cad_angles(delta: Vec2, screen: Vec2, sensitivity: f32) -> (f32, f32) {
    (
        sensitivity * PI * delta.x / screen.x,
        sensitivity * PI * delta.y / screen.y,
    )
}

/// Signed angle swept by the cursor around `center` between two pixels.
#[must_use]
pub fn screen_rotation_angle(previous: Vec2, current: Vec2, center: Vec2) -> f32 {
    let before = previous - center;
    let after = current - center;
    let angle = after.y.atan2(after.x) - before.y.atan2(before.x);
    // Unwrap across the ±π seam.
    if angle > PI {
        angle - 2.0 * PI
    } else if angle < -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(600.0, 400.0);
    const CENTER: Vec2 = Vec2::new(300.0, 200.0);

    fn angle_of(q: Quat) -> f32 {
        q.axis_angle().1
    }

    #[test]
    fn ball_heights_meet_at_the_limit() {
        let r = BALL_SIZE_LIMIT.sqrt();
        let inside = project_on_ball(r - 1e-4, 0.0);
        let outside = project_on_ball(r + 1e-4, 0.0);
        assert!((inside - outside).abs() < 1e-3);
        assert!((project_on_ball(0.0, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_continuous_across_the_boundary() {
        // Normalized radius sqrt(0.5) is reached at this pixel offset.
        let edge = BALL_SIZE_LIMIT.sqrt() * SCREEN.x;
        let step = Vec2::new(0.0, 2.0);
        let mut last = None;
        for offset in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let from = CENTER + Vec2::new(edge + offset, 0.0);
            let q = deformed_ball_quaternion(from, from + step, CENTER, SCREEN, 1.0);
            let angle = angle_of(q);
            assert!(angle.is_finite() && angle > 0.0);
            if let Some(prev) = last {
                let diff: f32 = angle - prev;
                assert!(diff.abs() < 1e-3, "jump of {diff} at offset {offset}");
            }
            last = Some(angle);
        }
    }

    #[test]
    fn horizontal_drag_rotates_camera_about_negative_y() {
        let q = deformed_ball_quaternion(
            CENTER,
            CENTER + Vec2::new(30.0, 0.0),
            CENTER,
            SCREEN,
            1.0,
        );
        let (axis, angle) = q.axis_angle();
        assert!(angle > 0.0);
        assert!((axis - Vec3::NEG_Y).length() < 1e-4, "{axis:?}");
    }

    #[test]
    fn no_motion_is_identity() {
        let p = Vec2::new(10.0, 20.0);
        let q = deformed_ball_quaternion(p, p, CENTER, SCREEN, 1.0);
        assert!(angle_of(q) < 1e-6);
    }

    #[test]
    fn screen_angle_unwraps() {
        let center = Vec2::ZERO;
        let a = Vec2::new(-1.0, 0.01);
        let b = Vec2::new(-1.0, -0.01);
        let angle = screen_rotation_angle(a, b, center);
        assert!(angle.abs() < 0.05, "{angle}");
        let quarter = screen_rotation_angle(Vec2::X, Vec2::Y, center);
        assert!((quarter - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn cad_half_turn_per_screen() {
        let (h, v) = cad_angles(SCREEN, SCREEN, 1.0);
        assert!((h - PI).abs() < 1e-6 && (v - PI).abs() < 1e-6);
    }
}
