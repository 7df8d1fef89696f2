use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, ProjectionType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection parameters.
pub struct CameraOptions {
    /// Perspective or orthographic projection.
    #[schemars(title = "Projection")]
    pub projection: ProjectionType,
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 10.0, max = 120.0), extend("step" = 1.0))]
    pub fov_degrees: f32,
    /// Near plane floor as a fraction of the clipping extent.
    #[schemars(skip)]
    pub z_near_coefficient: f32,
    /// Clipping extent as a multiple of the scene radius.
    #[schemars(title = "Clipping Extent", range(min = 1.0, max = 4.0), extend("step" = 0.05))]
    pub z_clipping_coefficient: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionType::Perspective,
            fov_degrees: 45.0,
            z_near_coefficient: 0.005,
            z_clipping_coefficient: 3.0_f32.sqrt(),
        }
    }
}

impl CameraOptions {
    /// Push these parameters into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.set_projection_type(self.projection);
        camera.set_field_of_view(self.fov_degrees.to_radians());
        camera.set_z_near_coefficient(self.z_near_coefficient);
        camera.set_z_clipping_coefficient(self.z_clipping_coefficient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_camera() {
        let camera = Camera::new();
        let mut configured = Camera::new();
        CameraOptions::default().apply(&mut configured);
        assert!(
            (camera.field_of_view() - configured.field_of_view()).abs() < 1e-6
        );
        assert_eq!(camera.projection_type(), configured.projection_type());
        assert!((camera.z_near() - configured.z_near()).abs() < 1e-6);
    }

    #[test]
    fn apply_switches_projection() {
        let mut camera = Camera::new();
        let opts = CameraOptions {
            projection: ProjectionType::Orthographic,
            fov_degrees: 60.0,
            ..CameraOptions::default()
        };
        opts.apply(&mut camera);
        assert_eq!(camera.projection_type(), ProjectionType::Orthographic);
        assert!((camera.field_of_view().to_degrees() - 60.0).abs() < 1e-4);
    }
}
