use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a drag (or wheel step) does to the manipulated frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No gesture in progress.
    #[default]
    None,
    /// Deformed-ball arcball rotation.
    Rotate,
    /// Turntable rotation about a fixed up axis.
    CadRotate,
    /// Pan parallel to the screen.
    Translate,
    /// Dolly along the view axis.
    Zoom,
    /// Rotation about the view axis, following the cursor angle.
    ScreenRotate,
    /// Pan locked to the dominant screen axis.
    ScreenTranslate,
    /// Fly forward while steering with pitch/yaw.
    MoveForward,
    /// Fly backward while steering with pitch/yaw.
    MoveBackward,
    /// Pitch/yaw without moving.
    LookAround,
    /// Rotation about the view axis from horizontal motion.
    Roll,
    /// Ground-vehicle steering: turn with x, throttle with y.
    Drive,
    /// Rubber-band a rectangle and zoom onto it on release.
    ZoomOnRegion,
}

impl Action {
    /// Rotation kinds that can keep spinning after release.
    #[must_use]
    pub const fn is_rotation(self) -> bool {
        matches!(self, Self::Rotate | Self::CadRotate | Self::ScreenRotate)
    }

    /// Translation kinds that can be tossed on release.
    #[must_use]
    pub const fn is_translation(self) -> bool {
        matches!(self, Self::Translate | Self::ScreenTranslate)
    }

    /// Kinds that keep moving on a fly timer while the button is held.
    #[must_use]
    pub const fn is_fly(self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBackward | Self::Drive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_do_not_overlap() {
        let all = [
            Action::None,
            Action::Rotate,
            Action::CadRotate,
            Action::Translate,
            Action::Zoom,
            Action::ScreenRotate,
            Action::ScreenTranslate,
            Action::MoveForward,
            Action::MoveBackward,
            Action::LookAround,
            Action::Roll,
            Action::Drive,
            Action::ZoomOnRegion,
        ];
        for action in all {
            let kinds = [
                action.is_rotation(),
                action.is_translation(),
                action.is_fly(),
            ];
            assert!(kinds.iter().filter(|k| **k).count() <= 1, "{action:?}");
        }
        assert!(!Action::Roll.is_rotation());
        assert!(Action::ScreenTranslate.is_translation());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Action::ZoomOnRegion).unwrap();
        assert_eq!(json, "\"zoom_on_region\"");
    }
}
