//! Mouse bindings: which [`Action`] a button or the wheel triggers under
//! a given modifier combination.
//!
//! Bindings serialize as arrays of tables so presets can be edited by
//! hand:
//!
//! ```toml
//! [[bindings.buttons]]
//! button = "left"
//! action = "zoom_on_region"
//! modifiers = { shift = true }
//! ```

use serde::{Deserialize, Serialize};

use super::event::{Modifiers, MouseButton};
use crate::interaction::Action;

/// One button binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    /// Button that starts the gesture.
    pub button: MouseButton,
    /// Exact modifier combination required.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Action performed while dragging.
    pub action: Action,
}

/// One wheel binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelBinding {
    /// Exact modifier combination required.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Action performed per wheel step.
    pub action: Action,
}

/// Button and wheel binding tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MouseBindings {
    buttons: Vec<ButtonBinding>,
    wheel: Vec<WheelBinding>,
}

impl Default for MouseBindings {
    fn default() -> Self {
        let button = |button, modifiers, action| ButtonBinding {
            button,
            modifiers,
            action,
        };
        Self {
            buttons: vec![
                button(MouseButton::Left, Modifiers::NONE, Action::Rotate),
                button(MouseButton::Middle, Modifiers::NONE, Action::Zoom),
                button(MouseButton::Right, Modifiers::NONE, Action::Translate),
                button(
                    MouseButton::Left,
                    Modifiers::SHIFT,
                    Action::ZoomOnRegion,
                ),
                button(
                    MouseButton::Left,
                    Modifiers::CTRL,
                    Action::ScreenRotate,
                ),
                button(
                    MouseButton::Right,
                    Modifiers::SHIFT,
                    Action::ScreenTranslate,
                ),
                button(MouseButton::Left, Modifiers::ALT, Action::CadRotate),
            ],
            wheel: vec![WheelBinding {
                modifiers: Modifiers::NONE,
                action: Action::Zoom,
            }],
        }
    }
}

impl MouseBindings {
    /// Bindings with nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buttons: Vec::new(),
            wheel: Vec::new(),
        }
    }

    /// Action bound to `button` under exactly `modifiers`, or
    /// [`Action::None`].
    #[must_use]
    pub fn button_action(
        &self,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Action {
        self.buttons
            .iter()
            .find(|b| b.button == button && b.modifiers == modifiers)
            .map_or(Action::None, |b| b.action)
    }

    /// Action bound to the wheel under exactly `modifiers`, or
    /// [`Action::None`].
    #[must_use]
    pub fn wheel_action(&self, modifiers: Modifiers) -> Action {
        self.wheel
            .iter()
            .find(|w| w.modifiers == modifiers)
            .map_or(Action::None, |w| w.action)
    }

    /// Bind (or rebind) a button. [`Action::None`] removes the binding.
    pub fn bind_button(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        action: Action,
    ) {
        self.buttons
            .retain(|b| !(b.button == button && b.modifiers == modifiers));
        if action != Action::None {
            self.buttons.push(ButtonBinding {
                button,
                modifiers,
                action,
            });
        }
    }

    /// Bind (or rebind) the wheel. [`Action::None`] removes the binding.
    pub fn bind_wheel(&mut self, modifiers: Modifiers, action: Action) {
        self.wheel.retain(|w| w.modifiers != modifiers);
        if action != Action::None {
            self.wheel.push(WheelBinding { modifiers, action });
        }
    }

    /// All button bindings.
    #[must_use]
    pub fn buttons(&self) -> &[ButtonBinding] {
        &self.buttons
    }

    /// All wheel bindings.
    #[must_use]
    pub fn wheel(&self) -> &[WheelBinding] {
        &self.wheel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookup() {
        let bindings = MouseBindings::default();
        assert_eq!(
            bindings.button_action(MouseButton::Left, Modifiers::NONE),
            Action::Rotate
        );
        assert_eq!(
            bindings.button_action(MouseButton::Left, Modifiers::SHIFT),
            Action::ZoomOnRegion
        );
        assert_eq!(
            bindings.button_action(MouseButton::Right, Modifiers::SHIFT),
            Action::ScreenTranslate
        );
        assert_eq!(
            bindings.button_action(MouseButton::Middle, Modifiers::ALT),
            Action::None
        );
        assert_eq!(bindings.wheel_action(Modifiers::NONE), Action::Zoom);
        assert_eq!(bindings.wheel_action(Modifiers::CTRL), Action::None);
    }

    #[test]
    fn rebinding_replaces_and_unbinds() {
        let mut bindings = MouseBindings::default();
        bindings.bind_button(
            MouseButton::Left,
            Modifiers::NONE,
            Action::LookAround,
        );
        assert_eq!(
            bindings.button_action(MouseButton::Left, Modifiers::NONE),
            Action::LookAround
        );
        assert_eq!(bindings.buttons().len(), 7);

        bindings.bind_button(MouseButton::Left, Modifiers::NONE, Action::None);
        assert_eq!(
            bindings.button_action(MouseButton::Left, Modifiers::NONE),
            Action::None
        );

        bindings.bind_wheel(Modifiers::SHIFT, Action::MoveForward);
        assert_eq!(
            bindings.wheel_action(Modifiers::SHIFT),
            Action::MoveForward
        );
    }
}
