//! Camera geometry engine.
//!
//! Provides the camera model (projection type, field of view, scene
//! bounding sphere, clip planes, cached matrices), screen↔world mapping,
//! fitting algorithms, frustum tests, eased transitions and a lock-free
//! snapshot channel for render threads.

/// Camera struct, projection type, matrices and GPU uniform.
pub mod core;
/// Sphere, box and screen-region fitting.
pub mod fit;
/// View frustum extraction and intersection tests.
pub mod frustum;
/// Project / unproject pipelines and click rays.
pub mod projection;
/// Lock-free camera snapshots for render threads.
pub mod snapshot;
/// Eased camera flights between poses.
pub mod transition;

pub use self::core::{Camera, CameraUniform, ProjectionType};
pub use fit::ScreenRect;
pub use frustum::{Frustum, FrustumSide, Plane};
pub use projection::{project, unproject, Viewport};
pub use snapshot::{snapshot_channel, SnapshotPublisher, SnapshotReader};
pub use transition::CameraTransition;
