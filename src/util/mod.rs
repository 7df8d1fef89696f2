//! Shared utilities.

/// Easing curves for camera transitions.
pub mod easing;
