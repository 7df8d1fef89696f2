//! Hierarchical position + orientation pose.
//!
//! A [`Frame`] stores a translation and rotation relative to an optional
//! reference (parent) frame. The parent is held weakly: the frame never
//! owns it, and a parent that has been dropped makes the frame behave as a
//! root. World pose is `parent.world ∘ local`.
//!
//! Naming follows the point/vector split:
//!
//! - `coordinates_of` / `inverse_coordinates_of` convert *points* (rotation
//!   and translation) from world to local and back;
//! - `transform_of` / `inverse_transform_of` convert *vectors* (rotation
//!   only).
//!
//! The `local_*` variants stop at the reference frame instead of walking to
//! the root.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Mat4, Quat, Vec3};

use crate::math::QuatExt;

/// Shared handle used to parent frames to one another.
pub type FrameRef = Rc<RefCell<Frame>>;

/// Position and orientation, optionally relative to a reference frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    translation: Vec3,
    rotation: Quat,
    reference: Option<Weak<RefCell<Frame>>>,
}

impl Frame {
    /// Root frame with the given local pose.
    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
            reference: None,
        }
    }

    /// Wrap the frame in a shared handle so it can act as a reference.
    #[must_use]
    pub fn into_shared(self) -> FrameRef {
        Rc::new(RefCell::new(self))
    }

    // ── Local pose ──

    /// Translation relative to the reference frame.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation relative to the reference frame.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set the translation relative to the reference frame.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    /// Set the rotation relative to the reference frame.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    /// Add `delta` (expressed in the reference frame) to the translation.
    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }

    /// Compose `delta` (expressed in this frame) into the rotation.
    pub fn rotate(&mut self, delta: Quat) {
        self.rotation = (self.rotation * delta).normalize();
    }

    /// Rotate by `rotation` (expressed in this frame) around a world point.
    ///
    /// The frame orientation changes exactly as with [`Frame::rotate`]; the
    /// position orbits `point`.
    pub fn rotate_around_point(&mut self, rotation: Quat, point: Vec3) {
        let (axis, angle) = rotation.axis_angle();
        let world_rotation = Quat::from_axis_angle_checked(
            self.inverse_transform_of(axis),
            angle,
        );
        let position = self.position();
        let orbited = point + world_rotation * (position - point);
        self.rotate(rotation);
        self.set_position(orbited);
    }

    // ── World pose ──

    /// Current reference frame, if set and still alive.
    #[must_use]
    pub fn reference(&self) -> Option<FrameRef> {
        self.reference.as_ref().and_then(Weak::upgrade)
    }

    /// Set (or clear) the reference frame.
    ///
    /// Returns `false` and leaves the frame untouched when the assignment
    /// would make this frame its own ancestor.
    pub fn set_reference(&mut self, reference: Option<&FrameRef>) -> bool {
        let Some(parent) = reference else {
            self.reference = None;
            return true;
        };
        if self.would_create_loop(parent) {
            log::warn!("refusing frame reference: it would create a loop");
            return false;
        }
        self.reference = Some(Rc::downgrade(parent));
        true
    }

    /// Walks up from `parent`, comparing cell addresses with `self` before
    /// borrowing so a frame that is currently borrowed is never touched.
    fn would_create_loop(&self, parent: &FrameRef) -> bool {
        let me: *const Frame = self;
        let mut cursor = Some(Rc::clone(parent));
        while let Some(frame) = cursor {
            if std::ptr::eq(frame.as_ptr().cast_const(), me) {
                return true;
            }
            cursor = frame.borrow().reference();
        }
        false
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        match self.reference() {
            Some(parent) => {
                parent.borrow().inverse_coordinates_of(self.translation)
            }
            None => self.translation,
        }
    }

    /// World-space orientation.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        match self.reference() {
            Some(parent) => {
                (parent.borrow().orientation() * self.rotation).normalize()
            }
            None => self.rotation,
        }
    }

    /// Move the frame to a world-space position.
    pub fn set_position(&mut self, position: Vec3) {
        self.translation = match self.reference() {
            Some(parent) => parent.borrow().coordinates_of(position),
            None => position,
        };
    }

    /// Set the world-space orientation.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.rotation = match self.reference() {
            Some(parent) => parent.borrow().orientation().inverse() * orientation,
            None => orientation,
        }
        .normalize();
    }

    /// Set both world-space position and orientation.
    pub fn set_position_and_orientation(
        &mut self,
        position: Vec3,
        orientation: Quat,
    ) {
        self.set_position(position);
        self.set_orientation(orientation);
    }

    /// Local → world matrix.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position())
    }

    // ── Point conversions ──

    /// Local coordinates of a world-space point.
    #[must_use]
    pub fn coordinates_of(&self, point: Vec3) -> Vec3 {
        let in_reference = match self.reference() {
            Some(parent) => parent.borrow().coordinates_of(point),
            None => point,
        };
        self.local_coordinates_of(in_reference)
    }

    /// World coordinates of a point expressed in this frame.
    #[must_use]
    pub fn inverse_coordinates_of(&self, point: Vec3) -> Vec3 {
        let in_reference = self.local_inverse_coordinates_of(point);
        match self.reference() {
            Some(parent) => parent.borrow().inverse_coordinates_of(in_reference),
            None => in_reference,
        }
    }

    /// Local coordinates of a point expressed in the reference frame.
    #[must_use]
    pub fn local_coordinates_of(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse_rotate(point - self.translation)
    }

    /// Reference-frame coordinates of a point expressed in this frame.
    #[must_use]
    pub fn local_inverse_coordinates_of(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    // ── Vector conversions ──

    /// Local components of a world-space vector.
    #[must_use]
    pub fn transform_of(&self, vector: Vec3) -> Vec3 {
        let in_reference = match self.reference() {
            Some(parent) => parent.borrow().transform_of(vector),
            None => vector,
        };
        self.local_transform_of(in_reference)
    }

    /// World components of a vector expressed in this frame.
    #[must_use]
    pub fn inverse_transform_of(&self, vector: Vec3) -> Vec3 {
        let in_reference = self.local_inverse_transform_of(vector);
        match self.reference() {
            Some(parent) => parent.borrow().inverse_transform_of(in_reference),
            None => in_reference,
        }
    }

    /// Local components of a vector expressed in the reference frame.
    #[must_use]
    pub fn local_transform_of(&self, vector: Vec3) -> Vec3 {
        self.rotation.inverse_rotate(vector)
    }

    /// Reference-frame components of a vector expressed in this frame.
    #[must_use]
    pub fn local_inverse_transform_of(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Translate the frame so that its position lies on the line through
    /// `origin` along `direction` (world space). The move is perpendicular
    /// to the line.
    pub fn project_on_line(&mut self, origin: Vec3, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else {
            return;
        };
        let offset = self.position() - origin;
        let on_line = origin + dir * offset.dot(dir);
        self.set_position(on_line);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn root_frame_conversions_round_trip() {
        let frame = Frame::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(Vec3::Y, FRAC_PI_2),
        );
        let p = Vec3::new(-2.0, 0.5, 7.0);
        assert!(approx(frame.inverse_coordinates_of(frame.coordinates_of(p)), p));
        assert!(approx(frame.inverse_transform_of(frame.transform_of(p)), p));

        // Local X maps to world -Z under a quarter turn about Y.
        assert!(approx(frame.inverse_transform_of(Vec3::X), -Vec3::Z));
        assert!(approx(
            frame.inverse_coordinates_of(Vec3::ZERO),
            Vec3::new(1.0, 2.0, 3.0)
        ));
    }

    #[test]
    fn child_pose_composes_with_parent() {
        let parent = Frame::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_axis_angle(Vec3::Z, FRAC_PI_2),
        )
        .into_shared();
        let mut child = Frame::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        assert!(child.set_reference(Some(&parent)));

        // Parent turns local X into world Y.
        assert!(approx(child.position(), Vec3::new(10.0, 1.0, 0.0)));
        assert!(approx(child.inverse_transform_of(Vec3::X), Vec3::Y));

        child.set_position(Vec3::new(10.0, 5.0, 0.0));
        assert!(approx(child.translation(), Vec3::new(5.0, 0.0, 0.0)));
        assert!(approx(child.position(), Vec3::new(10.0, 5.0, 0.0)));

        let q = Quat::from_axis_angle(Vec3::X, 0.7);
        child.set_orientation(q);
        assert!(child.orientation().dot(q).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn dropped_parent_degrades_to_root() {
        let mut child = Frame::new(Vec3::X, Quat::IDENTITY);
        {
            let parent = Frame::new(Vec3::Y, Quat::IDENTITY).into_shared();
            assert!(child.set_reference(Some(&parent)));
            assert!(approx(child.position(), Vec3::new(1.0, 1.0, 0.0)));
        }
        assert!(child.reference().is_none());
        assert!(approx(child.position(), Vec3::X));
    }

    #[test]
    fn reference_loops_are_refused() {
        let a = Frame::default().into_shared();
        let b = Frame::default().into_shared();
        assert!(b.borrow_mut().set_reference(Some(&a)));
        // a -> b -> a would loop.
        assert!(!a.borrow_mut().set_reference(Some(&b)));
        assert!(a.borrow().reference().is_none());
        // Self-reference is a loop too.
        assert!(!a.borrow_mut().set_reference(Some(&a)));
    }

    #[test]
    fn rotate_around_point_orbits() {
        let mut frame = Frame::new(Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY);
        frame.rotate_around_point(
            Quat::from_axis_angle(Vec3::Y, FRAC_PI_2),
            Vec3::ZERO,
        );
        assert!(approx(frame.position(), Vec3::new(5.0, 0.0, 0.0)));
        assert!(approx(frame.inverse_transform_of(-Vec3::Z), -Vec3::X));
    }

    #[test]
    fn translate_and_rotate_are_incremental() {
        let mut frame = Frame::default();
        frame.translate(Vec3::X);
        frame.translate(Vec3::X);
        assert!(approx(frame.translation(), Vec3::new(2.0, 0.0, 0.0)));

        frame.rotate(Quat::from_axis_angle(Vec3::Z, 0.25));
        frame.rotate(Quat::from_axis_angle(Vec3::Z, 0.25));
        let expected = Quat::from_axis_angle(Vec3::Z, 0.5);
        assert!(frame.rotation().dot(expected).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn project_on_line_moves_perpendicular() {
        let mut frame = Frame::new(Vec3::new(3.0, 4.0, 10.0), Quat::IDENTITY);
        frame.project_on_line(Vec3::ZERO, Vec3::Z);
        assert!(approx(frame.position(), Vec3::new(0.0, 0.0, 10.0)));
    }
}
