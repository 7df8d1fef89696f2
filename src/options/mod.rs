//! Camera and manipulation options with TOML preset support.
//!
//! Projection parameters, gesture tuning and mouse bindings are
//! consolidated here. Options serialize to/from TOML so a preset can be
//! stored next to the host application's other settings.

mod camera;
mod manipulation;

use std::path::Path;

pub use camera::CameraOptions;
pub(crate) use manipulation::check_friction;
pub use manipulation::{
    ManipulationOptions, SPINNING_FRICTION_RANGE, TOSSING_FRICTION_RANGE,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::input::MouseBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[manipulation]`) work.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Gesture sensitivities and inertia.
    pub manipulation: ManipulationOptions,
    /// Mouse bindings.
    #[schemars(skip)]
    pub bindings: MouseBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Io`] if the file cannot be read, or any error
    /// of [`from_toml`](Self::from_toml).
    pub fn load(path: &Path) -> Result<Self, ViewError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::OptionsParse`] for malformed TOML and
    /// [`ViewError::FrictionOutOfRange`] for rejected frictions.
    pub fn from_toml(content: &str) -> Result<Self, ViewError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| ViewError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::OptionsParse`] if serialization fails or
    /// [`ViewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the manipulators would refuse.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] for an invalid friction.
    pub fn validate(&self) -> Result<(), ViewError> {
        self.manipulation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ProjectionType;
    use crate::input::{Modifiers, MouseButton};
    use crate::interaction::Action;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
projection = "orthographic"

[manipulation]
spinning_friction = 0.25
fly_speed = 0.5
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.projection, ProjectionType::Orthographic);
        assert_eq!(opts.manipulation.spinning_friction, 0.25);
        assert_eq!(opts.manipulation.fly_speed, Some(0.5));
        // Everything else should be default
        assert_eq!(opts.camera.fov_degrees, 45.0);
        assert_eq!(opts.manipulation.tossing_friction, 1.0);
        assert_eq!(opts.bindings, MouseBindings::default());
    }

    #[test]
    fn bindings_load_from_toml() {
        let toml_str = r#"
[[bindings.buttons]]
button = "left"
action = "look_around"

[[bindings.buttons]]
button = "right"
action = "drive"
modifiers = { ctrl = true }

[[bindings.wheel]]
action = "move_forward"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        let bindings = &opts.bindings;
        assert_eq!(
            bindings.button_action(MouseButton::Left, Modifiers::NONE),
            Action::LookAround
        );
        assert_eq!(
            bindings.button_action(MouseButton::Right, Modifiers::CTRL),
            Action::Drive
        );
        assert_eq!(
            bindings.button_action(MouseButton::Middle, Modifiers::NONE),
            Action::None
        );
        assert_eq!(bindings.wheel_action(Modifiers::NONE), Action::MoveForward);
    }

    #[test]
    fn invalid_friction_is_rejected_on_load() {
        let err = Options::from_toml("[manipulation]\ntossing_friction = 0.0\n")
            .unwrap_err();
        assert!(matches!(err, ViewError::FrictionOutOfRange { .. }));
        let err = Options::from_toml("[camera]\nfov_degrees = \"wide\"\n")
            .unwrap_err();
        assert!(matches!(err, ViewError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("viewframe-options-test");
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.manipulation.rotation_sensitivity = 1.5;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("manipulation"));
        // Skipped sections should be absent
        assert!(!props.contains_key("bindings"));

        let manipulation = &props["manipulation"]["properties"];
        assert!(manipulation.get("spinning_friction").is_some());
        assert!(manipulation.get("fly_speed").is_none());
        let camera = &props["camera"]["properties"];
        assert!(camera.get("fov_degrees").is_some());
        assert!(camera.get("z_near_coefficient").is_none());
    }
}
