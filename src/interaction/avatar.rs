//! Third-person tracking.
//!
//! A [`Trackable`] tells a camera where to stand and what to look at.
//! [`AvatarFrame`] is the stock implementation: the camera trails the
//! avatar at a fixed distance, offset by an azimuth around the avatar's up
//! axis and an inclination above its horizon.

use std::f32::consts::FRAC_PI_6;

use glam::{Quat, Vec3};

use crate::frame::Frame;

/// Something a camera can follow.
pub trait Trackable {
    /// World position the camera should occupy.
    fn camera_position(&self) -> Vec3;
    /// World point the camera should look at.
    fn target(&self) -> Vec3;
    /// World up direction for the camera.
    fn up_vector(&self) -> Vec3;
}

/// A frame followed from behind and above.
#[derive(Debug, Clone)]
pub struct AvatarFrame {
    frame: Frame,
    tracking_distance: f32,
    azimuth: f32,
    inclination: f32,
}

impl AvatarFrame {
    /// Avatar at `position`, followed from `tracking_distance` behind it
    /// and 30° above its horizon.
    #[must_use]
    pub fn new(position: Vec3, tracking_distance: f32) -> Self {
        Self {
            frame: Frame::new(position, Quat::IDENTITY),
            tracking_distance,
            azimuth: 0.0,
            inclination: FRAC_PI_6,
        }
    }

    /// The avatar's pose.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable pose, for moving the avatar.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Camera distance from the avatar.
    #[must_use]
    pub fn tracking_distance(&self) -> f32 {
        self.tracking_distance
    }

    /// Set the camera distance from the avatar.
    pub fn set_tracking_distance(&mut self, distance: f32) {
        self.tracking_distance = distance;
    }

    /// Angle around the avatar's up axis, 0 = directly behind.
    #[must_use]
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Set the angle around the avatar's up axis.
    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.azimuth = azimuth;
    }

    /// Elevation above the avatar's horizon.
    #[must_use]
    pub fn inclination(&self) -> f32 {
        self.inclination
    }

    /// Set the elevation above the avatar's horizon.
    pub fn set_inclination(&mut self, inclination: f32) {
        self.inclination = inclination;
    }

    /// Camera offset in avatar coordinates. "Behind" is local +Z since the
    /// avatar faces −Z like the camera does.
    fn camera_offset(&self) -> Vec3 {
        Quat::from_rotation_y(self.azimuth)
            * Quat::from_rotation_x(-self.inclination)
            * Vec3::new(0.0, 0.0, self.tracking_distance)
    }
}

impl Trackable for AvatarFrame {
    fn camera_position(&self) -> Vec3 {
        self.frame.inverse_coordinates_of(self.camera_offset())
    }

    fn target(&self) -> Vec3 {
        self.frame.position()
    }

    fn up_vector(&self) -> Vec3 {
        self.frame.inverse_transform_of(Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn camera_trails_behind_and_above() {
        let avatar = AvatarFrame::new(Vec3::new(1.0, 0.0, 0.0), 10.0);
        let eye = avatar.camera_position();
        assert!(((eye - avatar.target()).length() - 10.0).abs() < 1e-4);
        assert!((eye.y - 5.0).abs() < 1e-4);
        assert!(eye.z > 0.0);
        assert_eq!(avatar.up_vector(), Vec3::Y);
    }

    #[test]
    fn follows_avatar_rotation() {
        let mut avatar = AvatarFrame::new(Vec3::ZERO, 2.0);
        avatar.set_inclination(0.0);
        avatar.frame_mut().set_rotation(Quat::from_rotation_y(FRAC_PI_2));
        // Facing −X now, so behind is +X.
        let eye = avatar.camera_position();
        assert!((eye - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }
}
