// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Camera geometry and interactive frame manipulation.
//!
//! Viewframe places a virtual camera in a scene and lets a user drive that
//! camera (or any other frame) with pointer gestures. Drags become arcball
//! rotations, screen-space translations, zooms and fly moves; a fast release
//! keeps the motion going as a decaying spin or toss.
//!
//! # Key entry points
//!
//! - [`camera::Camera`] - projection/view matrices, clip planes, fitting and
//!   screen↔world mapping
//! - [`frame::Frame`] - hierarchical position + orientation pose
//! - [`interaction::InteractiveCamera`] - camera manipulation state machine
//! - [`interaction::InteractiveFrame`] - object-frame manipulation seen
//!   through a camera
//! - [`input::InputProcessor`] - maps raw pointer events to bound actions
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! The crate owns no thread and no clock. The host forwards pointer samples
//! (with its own timestamps) and calls back into the manipulators when a
//! timer registered through the injected
//! [`interaction::Scheduler`] comes due. Render threads can receive
//! camera snapshots through the lock-free [`camera::snapshot`] channel.

pub mod camera;
pub mod error;
pub mod frame;
pub mod input;
pub mod interaction;
pub mod math;
pub mod options;
pub mod util;

pub use error::ViewError;
