//! Pointer-driven object frames.
//!
//! An [`InteractiveFrame`] moves a scene object as seen through a
//! [`Camera`]: the arcball turns it about its own origin, pans keep it
//! under the cursor and zoom moves it along the view axis. Motion is
//! expressed in the frame's reference so parented objects behave.
//!
//! Fly, drive, look-around and roll are camera-only actions and leave an
//! object untouched.

use std::fmt;
use std::time::Duration;

use glam::{Quat, Vec2, Vec3};

use super::action::Action;
use super::arcball::{cad_angles, deformed_ball_quaternion, screen_rotation_angle};
use super::interactive_camera::WHEEL_SETTLE_DELAY;
use super::scheduler::{ManualScheduler, Scheduler, Timer};
use super::state::{ManipulationState, ScreenAxis};
use crate::camera::Camera;
use crate::error::ViewError;
use crate::frame::{Frame, FrameRef};
use crate::math::QuatExt;

/// Fraction of the camera distance covered by one wheel step.
const WHEEL_ZOOM_STEP: f32 = 0.1;

type ManipulatedHandler = Box<dyn FnMut(&Frame)>;

/// A shared frame plus the gesture state machine that moves it.
pub struct InteractiveFrame<S: Scheduler = ManualScheduler> {
    frame: FrameRef,
    state: ManipulationState,
    scheduler: S,
    scene_up_vector: Vec3,
    on_manipulated: Option<ManipulatedHandler>,
}

impl<S: Scheduler + fmt::Debug> fmt::Debug for InteractiveFrame<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveFrame")
            .field("frame", &self.frame)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl InteractiveFrame<ManualScheduler> {
    /// Manipulate `frame` with a host-clocked [`ManualScheduler`].
    #[must_use]
    pub fn new(frame: FrameRef) -> Self {
        Self::with_scheduler(frame, ManualScheduler::new())
    }

    /// Advance the scheduler clock to `now` and handle every timer due.
    pub fn run_due_timers(&mut self, now: Duration) -> bool {
        self.scheduler.advance_to(now);
        let mut changed = false;
        while let Some(timer) = self.scheduler.pop_due() {
            changed |= self.on_timer(timer);
        }
        changed
    }
}

impl<S: Scheduler> InteractiveFrame<S> {
    /// Manipulate `frame`, arming timers through `scheduler`.
    #[must_use]
    pub fn with_scheduler(frame: FrameRef, scheduler: S) -> Self {
        Self {
            frame,
            state: ManipulationState::default(),
            scheduler,
            scene_up_vector: Vec3::Y,
            on_manipulated: None,
        }
    }

    /// World axis CAD rotation turns the object around.
    #[must_use]
    pub fn scene_up_vector(&self) -> Vec3 {
        self.scene_up_vector
    }

    /// Set the scene up axis, usually
    /// [`InteractiveCamera::scene_up_vector`](super::InteractiveCamera::scene_up_vector)
    /// so objects and camera agree. Zero vectors are ignored.
    pub fn set_scene_up_vector(&mut self, up: Vec3) {
        if let Some(up) = up.try_normalize() {
            self.scene_up_vector = up;
        }
    }

    /// Shared handle to the manipulated frame.
    #[must_use]
    pub fn frame(&self) -> &FrameRef {
        &self.frame
    }

    /// Gesture and inertia state.
    #[must_use]
    pub fn state(&self) -> &ManipulationState {
        &self.state
    }

    /// Mutable state, for sensitivity and friction setters.
    pub fn state_mut(&mut self) -> &mut ManipulationState {
        &mut self.state
    }

    /// The timer backend.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable timer backend.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Set the spin friction, accepted in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] and keeps the previous
    /// value when `friction` is outside the accepted range.
    pub fn set_spinning_friction(&mut self, friction: f32) -> Result<(), ViewError> {
        self.state.set_spinning_friction(friction)
    }

    /// Set the toss friction, accepted in `[0.01, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] and keeps the previous
    /// value when `friction` is outside the accepted range.
    pub fn set_tossing_friction(&mut self, friction: f32) -> Result<(), ViewError> {
        self.state.set_tossing_friction(friction)
    }

    /// Install a callback run after every change to the frame made by this
    /// manipulator.
    pub fn set_on_manipulated(&mut self, handler: impl FnMut(&Frame) + 'static) {
        self.on_manipulated = Some(Box::new(handler));
    }

    /// Whether the frame is spinning.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    /// Whether the frame is being tossed.
    #[must_use]
    pub fn is_tossing(&self) -> bool {
        self.state.is_tossing()
    }

    /// Stop spinning.
    pub fn stop_spinning(&mut self) {
        self.state.stop_spinning(&mut self.scheduler);
    }

    /// Stop tossing.
    pub fn stop_tossing(&mut self) {
        self.state.stop_tossing(&mut self.scheduler);
    }

    /// Start a gesture bound to `action` at `pixel`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::GestureInProgress`] while another gesture is
    /// active.
    pub fn press(
        &mut self,
        action: Action,
        pixel: Vec2,
        timestamp: Duration,
    ) -> Result<(), ViewError> {
        self.scheduler.observe(timestamp);
        self.state
            .begin(action, pixel, timestamp, &mut self.scheduler)?;
        if action.is_fly()
            || matches!(
                action,
                Action::LookAround | Action::Roll | Action::ZoomOnRegion
            )
        {
            log::debug!("{action:?} does not move object frames");
        }
        Ok(())
    }

    /// Continue the gesture to `pixel`, seen through `camera`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] without a preceding press.
    pub fn drag(
        &mut self,
        camera: &Camera,
        pixel: Vec2,
        timestamp: Duration,
    ) -> Result<(), ViewError> {
        let delta = self.state.sample(pixel, timestamp)?;
        self.scheduler.observe(timestamp);
        let screen = Vec2::new(
            camera.screen_width() as f32,
            camera.screen_height() as f32,
        );
        let position = self.frame.borrow().position();
        let sensitivity = self.state.options().rotation_sensitivity;
        let moved = match self.state.action() {
            Action::Rotate => {
                let q = deformed_ball_quaternion(
                    self.state.previous_position(),
                    pixel,
                    projected_center(camera, position, screen),
                    screen,
                    sensitivity,
                );
                // Camera-space axis, inverted so the object follows the
                // cursor instead of the eye.
                let (axis, angle) = q.axis_angle();
                let world_axis = camera.frame().inverse_transform_of(-axis);
                self.rotate_about_world_axis(world_axis, angle);
                true
            }
            Action::CadRotate => {
                let (horizontal, vertical) =
                    cad_angles(delta, screen, sensitivity);
                let rotation = {
                    let frame = self.frame.borrow();
                    let yaw = Quat::from_axis_angle_checked(
                        frame.transform_of(self.scene_up_vector),
                        horizontal,
                    );
                    let pitch = Quat::from_axis_angle_checked(
                        frame.transform_of(camera.right_vector()),
                        vertical,
                    );
                    yaw * pitch
                };
                self.rotate_local(rotation);
                true
            }
            Action::ScreenRotate => {
                let angle = screen_rotation_angle(
                    self.state.previous_position(),
                    pixel,
                    projected_center(camera, position, screen),
                );
                self.rotate_about_world_axis(camera.view_direction(), angle);
                true
            }
            Action::Translate => {
                self.pan(camera, position, Vec2::new(delta.x, -delta.y));
                true
            }
            Action::ScreenTranslate => {
                let locked = match self.state.screen_axis(pixel) {
                    Some(ScreenAxis::Horizontal) => Vec2::new(delta.x, 0.0),
                    Some(ScreenAxis::Vertical) => Vec2::new(0.0, -delta.y),
                    None => Vec2::ZERO,
                };
                self.pan(camera, position, locked);
                true
            }
            Action::Zoom => {
                let distance = (camera.position() - position).length();
                let dz = distance * delta.y / screen.y
                    * self.state.options().zoom_sensitivity;
                let world = camera
                    .frame()
                    .inverse_transform_of(Vec3::new(0.0, 0.0, dz));
                let _ = self.translate_world(world);
                true
            }
            Action::None
            | Action::MoveForward
            | Action::MoveBackward
            | Action::LookAround
            | Action::Roll
            | Action::Drive
            | Action::ZoomOnRegion => false,
        };
        self.state.commit(pixel);
        if moved {
            self.notify();
        }
        Ok(())
    }

    /// End the gesture at `pixel`. Fast rotations spin, fast pans toss.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] without a preceding press.
    pub fn release(
        &mut self,
        camera: &Camera,
        pixel: Vec2,
        timestamp: Duration,
    ) -> Result<(), ViewError> {
        if !self.state.is_active() {
            return Err(ViewError::NoActiveGesture);
        }
        if pixel != self.state.previous_position() {
            self.drag(camera, pixel, timestamp)?;
        }
        let _ = self.state.end(&mut self.scheduler)?;
        Ok(())
    }

    /// Move the frame toward (positive `steps`) or away from the camera.
    /// Only [`Action::Zoom`] is supported.
    pub fn wheel(
        &mut self,
        camera: &Camera,
        action: Action,
        steps: f32,
        timestamp: Duration,
    ) -> bool {
        self.scheduler.observe(timestamp);
        if action != Action::Zoom {
            log::debug!("wheel ignores {action:?} on object frames");
            return false;
        }
        let position = self.frame.borrow().position();
        let distance = (camera.position() - position).length();
        let dz = steps
            * self.state.options().wheel_sensitivity
            * WHEEL_ZOOM_STEP
            * distance;
        let world = camera
            .frame()
            .inverse_transform_of(Vec3::new(0.0, 0.0, dz));
        let _ = self.translate_world(world);
        self.scheduler
            .schedule_once(Timer::WheelSettle, WHEEL_SETTLE_DELAY);
        self.notify();
        true
    }

    /// Handle a fired timer. Returns `true` when the frame moved or a
    /// redraw is due.
    pub fn on_timer(&mut self, timer: Timer) -> bool {
        let changed = match timer {
            Timer::Spin => match self.state.spin_tick(&mut self.scheduler) {
                Some(rotation) => {
                    self.frame.borrow_mut().rotate(rotation);
                    true
                }
                None => false,
            },
            Timer::Toss => match self.state.toss_tick(&mut self.scheduler) {
                Some(translation) => {
                    self.frame.borrow_mut().translate(translation);
                    true
                }
                None => false,
            },
            Timer::Fly => {
                self.scheduler.cancel(Timer::Fly);
                false
            }
            Timer::WheelSettle => true,
        };
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&mut self) {
        if let Some(handler) = self.on_manipulated.as_mut() {
            handler(&self.frame.borrow());
        }
    }

    fn rotate_local(&mut self, rotation: Quat) {
        self.frame.borrow_mut().rotate(rotation);
        self.state.record_rotation(rotation);
    }

    fn rotate_about_world_axis(&mut self, axis: Vec3, angle: f32) {
        let local_axis = self.frame.borrow().transform_of(axis);
        self.rotate_local(Quat::from_axis_angle_checked(local_axis, angle));
    }

    /// Translate by a world vector; returns it in reference coordinates.
    fn translate_world(&mut self, world: Vec3) -> Vec3 {
        let reference = self.frame.borrow().reference();
        let in_reference = match reference {
            Some(parent) => parent.borrow().transform_of(world),
            None => world,
        };
        self.frame.borrow_mut().translate(in_reference);
        in_reference
    }

    /// Pan by a screen delta (x right, y up) scaled at the frame's depth.
    fn pan(&mut self, camera: &Camera, position: Vec3, screen_delta: Vec2) {
        let local = screen_delta.extend(0.0)
            * camera.pixel_to_scene_ratio(position)
            * self.state.options().translation_sensitivity;
        let applied =
            self.translate_world(camera.frame().inverse_transform_of(local));
        self.state.record_translation(applied);
    }
}

/// Pixel of the frame origin, or the screen center when it cannot be
/// projected.
fn projected_center(camera: &Camera, position: Vec3, screen: Vec2) -> Vec2 {
    camera
        .projected_coordinates_of(position)
        .map_or(screen * 0.5, Vec3::truncate)
}
