//! Smooth camera flights between two poses.
//!
//! Position is interpolated linearly and orientation along the shorter
//! great-circle arc, both driven by an easing curve. The host advances the
//! transition with its own frame delta.

use std::time::Duration;

use glam::{Quat, Vec3};

use super::core::Camera;
use crate::frame::Frame;
use crate::math::slerp_shortest;
use crate::util::easing::EasingFunction;

/// Eased flight of the camera frame toward a target pose.
#[derive(Debug, Clone)]
pub struct CameraTransition {
    start_position: Vec3,
    start_orientation: Quat,
    end_position: Vec3,
    end_orientation: Quat,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFunction,
}

impl CameraTransition {
    /// Flight from `from` to `to` (world poses) over `duration`.
    #[must_use]
    pub fn new(from: &Frame, to: &Frame, duration: Duration) -> Self {
        Self {
            start_position: from.position(),
            start_orientation: from.orientation(),
            end_position: to.position(),
            end_orientation: to.orientation(),
            duration,
            elapsed: Duration::ZERO,
            easing: EasingFunction::default(),
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized time in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the flight has reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Interpolated world pose at the current time.
    #[must_use]
    pub fn pose(&self) -> (Vec3, Quat) {
        let s = self.easing.evaluate(self.progress());
        (
            self.start_position.lerp(self.end_position, s),
            slerp_shortest(self.start_orientation, self.end_orientation, s),
        )
    }

    /// Advance by `dt` and move the camera. Returns `true` once finished.
    pub fn advance(&mut self, dt: Duration, camera: &mut Camera) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let (position, orientation) = self.pose();
        camera
            .frame_mut()
            .set_position_and_orientation(position, orientation);
        self.is_finished()
    }
}
