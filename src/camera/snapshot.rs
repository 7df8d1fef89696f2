//! Camera snapshots for a render thread.
//!
//! Manipulation (input, inertia ticks) and rendering may run on different
//! threads. Rather than sharing the camera behind a lock, the manipulation
//! side publishes a [`CameraUniform`] after each change and the render side
//! reads the most recent one through a lock-free triple buffer.

use super::core::{Camera, CameraUniform};

/// Writing half, owned by the thread that mutates the camera.
pub struct SnapshotPublisher {
    input: triple_buffer::Input<CameraUniform>,
}

/// Reading half, owned by the render thread.
pub struct SnapshotReader {
    output: triple_buffer::Output<CameraUniform>,
}

/// Create a publisher/reader pair seeded with the camera's current state.
#[must_use]
pub fn snapshot_channel(camera: &Camera) -> (SnapshotPublisher, SnapshotReader) {
    let (input, output) = triple_buffer::triple_buffer(&camera.uniform());
    (SnapshotPublisher { input }, SnapshotReader { output })
}

impl SnapshotPublisher {
    /// Publish the camera's current matrices.
    pub fn publish(&mut self, camera: &Camera) {
        self.input.write(camera.uniform());
    }
}

impl SnapshotReader {
    /// Most recent snapshot. Never blocks.
    pub fn latest(&mut self) -> &CameraUniform {
        self.output.read()
    }

    /// Whether a snapshot newer than the last [`latest`](Self::latest)
    /// call is waiting.
    #[must_use]
    pub fn has_update(&self) -> bool {
        self.output.updated()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn reader_sees_latest_publish() {
        let mut camera = Camera::new();
        let (mut publisher, mut reader) = snapshot_channel(&camera);
        assert_eq!(reader.latest().position, camera.position().to_array());

        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        publisher.publish(&camera);
        assert!(reader.has_update());
        assert_eq!(reader.latest().position, [1.0, 2.0, 3.0]);
        assert!(!reader.has_update());
    }

    #[test]
    fn snapshots_cross_threads() {
        let camera = Camera::new();
        let (mut publisher, mut reader) = snapshot_channel(&camera);
        let handle = std::thread::spawn(move || {
            let mut camera = Camera::new();
            camera.set_position(Vec3::new(0.0, 0.0, 9.0));
            publisher.publish(&camera);
        });
        handle.join().unwrap();
        assert_eq!(reader.latest().position, [0.0, 0.0, 9.0]);
    }
}
