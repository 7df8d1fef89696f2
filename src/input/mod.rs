//! Input handling: platform-agnostic pointer events, mouse bindings and
//! the processor that turns events into camera gestures.

/// Mouse button and wheel bindings.
pub mod bindings;
/// Platform-agnostic input events.
pub mod event;
/// Routes bound events into an interactive camera.
pub mod processor;

pub use bindings::{ButtonBinding, MouseBindings, WheelBinding};
pub use event::{InputEvent, Modifiers, MouseButton};
pub use processor::InputProcessor;
