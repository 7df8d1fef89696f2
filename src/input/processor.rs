//! Routes raw pointer events into an [`InteractiveCamera`].
//!
//! The `InputProcessor` owns the mouse bindings and remembers which button
//! started the current gesture. It is the only thing between raw window
//! events and the camera's press/drag/release/wheel entry points.

use glam::Vec2;

use super::bindings::MouseBindings;
use super::event::{InputEvent, MouseButton};
use crate::error::ViewError;
use crate::interaction::{Action, InteractiveCamera, Scheduler};

/// Resolves pointer events through [`MouseBindings`] and drives a camera.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if processor.handle_event(&mut camera, event)? {
///     request_redraw();
/// }
/// // Once per frame:
/// if camera.run_due_timers(now) {
///     request_redraw();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Button that started the gesture in progress.
    active_button: Option<MouseButton>,
    /// Button/wheel → action mapping.
    bindings: MouseBindings,
}

impl InputProcessor {
    /// Create a processor with default bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom bindings.
    #[must_use]
    pub fn with_bindings(bindings: MouseBindings) -> Self {
        Self {
            active_button: None,
            bindings,
        }
    }

    /// Read-only access to the bindings.
    #[must_use]
    pub fn bindings(&self) -> &MouseBindings {
        &self.bindings
    }

    /// Mutable access to the bindings for reconfiguration.
    pub fn bindings_mut(&mut self) -> &mut MouseBindings {
        &mut self.bindings
    }

    /// Button driving the current gesture, if any.
    #[must_use]
    pub fn active_button(&self) -> Option<MouseButton> {
        self.active_button
    }

    /// Feed one event to `camera`. Returns whether the event was consumed.
    ///
    /// Unbound presses, presses of a second button during a gesture,
    /// hover motion and releases of buttons that did not start the
    /// gesture are ignored.
    ///
    /// # Errors
    ///
    /// Propagates errors from the camera's gesture methods.
    pub fn handle_event<S: Scheduler>(
        &mut self,
        camera: &mut InteractiveCamera<S>,
        event: InputEvent,
    ) -> Result<bool, ViewError> {
        match event {
            InputEvent::Press {
                button,
                x,
                y,
                modifiers,
                timestamp,
            } => {
                if self.active_button.is_some() {
                    return Ok(false);
                }
                let action = self.bindings.button_action(button, modifiers);
                if action == Action::None {
                    return Ok(false);
                }
                camera.press(action, Vec2::new(x, y), timestamp)?;
                self.active_button = Some(button);
                Ok(true)
            }
            InputEvent::Drag { x, y, timestamp } => {
                if self.active_button.is_none() {
                    return Ok(false);
                }
                camera.drag(Vec2::new(x, y), timestamp)?;
                Ok(true)
            }
            InputEvent::Release {
                button,
                x,
                y,
                timestamp,
            } => {
                if self.active_button != Some(button) {
                    return Ok(false);
                }
                self.active_button = None;
                camera.release(Vec2::new(x, y), timestamp)?;
                Ok(true)
            }
            InputEvent::Wheel {
                steps,
                modifiers,
                timestamp,
            } => {
                let action = self.bindings.wheel_action(modifiers);
                Ok(camera.wheel(action, steps, timestamp))
            }
        }
    }
}
