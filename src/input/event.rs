use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Platform-agnostic pointer events.
///
/// Pixel coordinates have their origin at the top-left corner of the
/// window with Y growing downward. Timestamps come from the host clock and
/// only their differences matter.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor), which
/// resolves bindings and drives an
/// [`InteractiveCamera`](crate::interaction::InteractiveCamera).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed.
    Press {
        /// Which button went down.
        button: MouseButton,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
        /// Modifier keys held at press time.
        modifiers: Modifiers,
        /// Host time of the event.
        timestamp: Duration,
    },
    /// Cursor moved (with or without a button held).
    Drag {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
        /// Host time of the event.
        timestamp: Duration,
    },
    /// Mouse button released.
    Release {
        /// Which button went up.
        button: MouseButton,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
        /// Host time of the event.
        timestamp: Duration,
    },
    /// Scroll wheel (positive = toward the scene).
    Wheel {
        /// Wheel steps, fractional for high-resolution wheels.
        steps: f32,
        /// Modifier keys held while scrolling.
        modifiers: Modifiers,
        /// Host time of the event.
        timestamp: Duration,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Modifier keys relevant to binding lookup.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Alt (option) held.
    pub alt: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}
