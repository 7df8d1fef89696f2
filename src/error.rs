//! Crate-level error types.

use std::fmt;

/// Errors produced by the viewframe crate.
#[derive(Debug)]
pub enum ViewError {
    /// Scene radius must be strictly positive.
    InvalidSceneRadius(f32),
    /// A friction coefficient fell outside its accepted range.
    FrictionOutOfRange {
        /// Rejected value.
        value: f32,
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// A drag or release arrived without a preceding press.
    NoActiveGesture,
    /// A press arrived while another gesture was still active.
    GestureInProgress,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSceneRadius(radius) => {
                write!(f, "scene radius must be positive, got {radius}")
            }
            Self::FrictionOutOfRange { value, min, max } => {
                write!(f, "friction {value} outside [{min}, {max}]")
            }
            Self::NoActiveGesture => {
                write!(f, "drag or release without a preceding press")
            }
            Self::GestureInProgress => {
                write!(f, "press while a gesture is already active")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
