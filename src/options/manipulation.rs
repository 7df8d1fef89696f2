use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Accepted spinning friction range.
pub const SPINNING_FRICTION_RANGE: (f32, f32) = (0.0, 1.0);
/// Accepted tossing friction range. Zero is excluded so a toss always
/// comes to rest.
pub const TOSSING_FRICTION_RANGE: (f32, f32) = (0.01, 1.0);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Manipulation", inline)]
#[serde(default)]
/// Gesture sensitivities, inertia and fly parameters.
pub struct ManipulationOptions {
    /// Arcball and pitch/yaw gain.
    #[schemars(title = "Rotation Sensitivity", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub rotation_sensitivity: f32,
    /// Pan gain.
    #[schemars(title = "Translation Sensitivity", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub translation_sensitivity: f32,
    /// Release speed (pixels per millisecond) above which a rotation spins.
    #[schemars(title = "Spin Threshold", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub spinning_sensitivity: f32,
    /// Release speed (pixels per millisecond) above which a pan is tossed.
    #[schemars(title = "Toss Threshold", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub tossing_sensitivity: f32,
    /// Wheel step gain.
    #[schemars(title = "Wheel Sensitivity", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub wheel_sensitivity: f32,
    /// Drag-zoom gain.
    #[schemars(title = "Zoom Sensitivity", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub zoom_sensitivity: f32,
    /// Spin decay. 0 spins forever, 1 stops after one tick.
    #[schemars(title = "Spin Friction", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub spinning_friction: f32,
    /// Toss decay.
    #[schemars(title = "Toss Friction", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub tossing_friction: f32,
    /// Fly step per tick in world units. Unset follows the scene radius.
    #[schemars(skip)]
    pub fly_speed: Option<f32>,
}

impl Default for ManipulationOptions {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 1.0,
            translation_sensitivity: 1.0,
            spinning_sensitivity: 0.3,
            tossing_sensitivity: 0.3,
            wheel_sensitivity: 1.0,
            zoom_sensitivity: 1.0,
            spinning_friction: 0.0,
            tossing_friction: 1.0,
            fly_speed: None,
        }
    }
}

/// Check `value` against an inclusive `(min, max)` range.
pub(crate) fn check_friction(
    value: f32,
    (min, max): (f32, f32),
) -> Result<f32, ViewError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        log::warn!("rejecting friction {value}: outside [{min}, {max}]");
        Err(ViewError::FrictionOutOfRange { value, min, max })
    }
}

impl ManipulationOptions {
    /// Reject out-of-range friction values.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] for the first friction
    /// outside its range.
    pub fn validate(&self) -> Result<(), ViewError> {
        let _ = check_friction(self.spinning_friction, SPINNING_FRICTION_RANGE)?;
        let _ = check_friction(self.tossing_friction, TOSSING_FRICTION_RANGE)?;
        Ok(())
    }
}
