//! Gesture-driven manipulation of cameras and object frames.
//!
//! Hosts report presses, drags, releases and wheel steps with their own
//! timestamps. A [`ManipulationState`] turns them into speeds and deltas,
//! [`InteractiveCamera`] and [`InteractiveFrame`] turn those into frame
//! motion, and a [`Scheduler`] calls back for spin, toss, fly and wheel
//! settle ticks.

/// Bindable manipulation actions.
pub mod action;
/// Deformed-ball arcball and screen rotation helpers.
pub mod arcball;
/// Third-person camera tracking.
pub mod avatar;
/// Host-timed expiring flags.
pub mod hint;
/// Friction-damped spin and toss.
pub mod inertia;
/// Camera manipulation.
pub mod interactive_camera;
/// Object frame manipulation.
pub mod interactive_frame;
/// Timer tokens and the scheduler seam.
pub mod scheduler;
/// Gesture session state.
pub mod state;

pub use action::Action;
pub use avatar::{AvatarFrame, Trackable};
pub use hint::ExpiringFlag;
pub use inertia::{Inertia, InertialDelta, Tick};
pub use interactive_camera::InteractiveCamera;
pub use interactive_frame::InteractiveFrame;
pub use scheduler::{ManualScheduler, Scheduler, Timer};
pub use state::{ManipulationState, ScreenAxis};
