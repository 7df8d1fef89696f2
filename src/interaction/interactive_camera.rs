//! Pointer-driven camera.
//!
//! [`InteractiveCamera`] owns a [`Camera`] and moves its frame in response
//! to gestures. Rotations pivot on the revolve-around point, pans keep the
//! point under the cursor fixed at the pivot depth, and fly modes move the
//! camera on a repeating timer while the button is held.
//!
//! The host reports gestures through [`press`](InteractiveCamera::press),
//! [`drag`](InteractiveCamera::drag), [`release`](InteractiveCamera::release)
//! and [`wheel`](InteractiveCamera::wheel), and hands fired timers back via
//! [`on_timer`](InteractiveCamera::on_timer).

use std::f32::consts::PI;
use std::fmt;
use std::time::Duration;

use glam::{Quat, Vec2, Vec3};

use super::action::Action;
use super::arcball::{cad_angles, deformed_ball_quaternion, screen_rotation_angle};
use super::avatar::Trackable;
use super::hint::ExpiringFlag;
use super::scheduler::{ManualScheduler, Scheduler, Timer};
use super::state::{ManipulationState, ScreenAxis};
use crate::camera::{Camera, ProjectionType, ScreenRect};
use crate::error::ViewError;
use crate::math::QuatExt;
use crate::options::{ManipulationOptions, Options};

/// Fly/drive motion period.
pub const FLY_INTERVAL: Duration = Duration::from_millis(10);
/// Quiet time after the last wheel step before the settle tick.
pub const WHEEL_SETTLE_DELAY: Duration = Duration::from_millis(400);
/// How long the pivot marker stays visible after the pivot moves.
pub const PIVOT_HINT_LIFETIME: Duration = Duration::from_secs(1);

/// Default fly step as a fraction of the scene radius.
const FLY_SPEED_COEFFICIENT: f32 = 0.01;
/// Zoom distance floor as a fraction of the scene radius.
const MIN_ZOOM_DISTANCE_COEFFICIENT: f32 = 0.2;
/// Fraction of the pivot distance covered by one wheel step.
const WHEEL_ZOOM_STEP: f32 = 0.1;
/// Fly steps covered by one wheel step.
const WHEEL_FLY_STEP: f32 = 0.2;
/// Drive throttle per pixel of vertical offset from the press.
const DRIVE_THROTTLE: f32 = 0.01;

type ManipulatedHandler = Box<dyn FnMut(&Camera)>;

/// A camera plus the gesture state machine that moves it.
pub struct InteractiveCamera<S: Scheduler = ManualScheduler> {
    camera: Camera,
    state: ManipulationState,
    scheduler: S,
    scene_up_vector: Vec3,
    drive_speed: f32,
    pivot_hint: ExpiringFlag,
    on_manipulated: Option<ManipulatedHandler>,
}

impl<S: Scheduler + fmt::Debug> fmt::Debug for InteractiveCamera<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveCamera")
            .field("camera", &self.camera)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("scene_up_vector", &self.scene_up_vector)
            .field("drive_speed", &self.drive_speed)
            .field("pivot_hint", &self.pivot_hint)
            .finish_non_exhaustive()
    }
}

impl InteractiveCamera<ManualScheduler> {
    /// Wrap `camera` with a host-clocked [`ManualScheduler`].
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self::with_scheduler(camera, ManualScheduler::new())
    }

    /// Advance the scheduler clock to `now` and handle every timer due.
    /// Returns `true` when any tick moved the camera or asked for a
    /// redraw.
    pub fn run_due_timers(&mut self, now: Duration) -> bool {
        self.scheduler.advance_to(now);
        let mut changed = false;
        while let Some(timer) = self.scheduler.pop_due() {
            changed |= self.on_timer(timer);
        }
        changed
    }
}

impl Default for InteractiveCamera<ManualScheduler> {
    fn default() -> Self {
        Self::new(Camera::new())
    }
}

impl<S: Scheduler> InteractiveCamera<S> {
    /// Wrap `camera`, arming timers through `scheduler`.
    #[must_use]
    pub fn with_scheduler(camera: Camera, scheduler: S) -> Self {
        Self {
            camera,
            state: ManipulationState::default(),
            scheduler,
            scene_up_vector: Vec3::Y,
            drive_speed: 0.0,
            pivot_hint: ExpiringFlag::default(),
            on_manipulated: None,
        }
    }

    // ── Accessors ──

    /// The manipulated camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access. Changes made here do not trigger the
    /// manipulation callback.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
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

    /// Current manipulation tuning.
    #[must_use]
    pub fn options(&self) -> &ManipulationOptions {
        self.state.options()
    }

    /// Apply camera and manipulation options. Invalid frictions are
    /// rejected (keeping their previous values) and reported; the rest is
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] if either friction was
    /// rejected.
    pub fn apply_options(&mut self, options: &Options) -> Result<(), ViewError> {
        options.camera.apply(&mut self.camera);
        self.state.apply_options(&options.manipulation)
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

    /// World axis used as "up" by turntable rotation and fly steering.
    #[must_use]
    pub fn scene_up_vector(&self) -> Vec3 {
        self.scene_up_vector
    }

    /// Set the scene up axis. Zero vectors are ignored.
    pub fn set_scene_up_vector(&mut self, up: Vec3) {
        if let Some(up) = up.try_normalize() {
            self.scene_up_vector = up;
        }
    }

    /// Fly step per tick: the configured value, or 1% of the scene radius.
    #[must_use]
    pub fn fly_speed(&self) -> f32 {
        self.state
            .options()
            .fly_speed
            .unwrap_or(FLY_SPEED_COEFFICIENT * self.camera.scene_radius())
    }

    /// Current drive throttle (negative moves forward).
    #[must_use]
    pub fn drive_speed(&self) -> f32 {
        self.drive_speed
    }

    /// Install a callback run after every change to the camera frame made
    /// by this manipulator.
    pub fn set_on_manipulated(&mut self, handler: impl FnMut(&Camera) + 'static) {
        self.on_manipulated = Some(Box::new(handler));
    }

    /// Remove the manipulation callback.
    pub fn clear_on_manipulated(&mut self) {
        self.on_manipulated = None;
    }

    // ── Gestures ──

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
        if action.is_fly() {
            self.drive_speed = 0.0;
            self.scheduler.schedule_repeating(Timer::Fly, FLY_INTERVAL);
        }
        Ok(())
    }

    /// Continue the gesture to `pixel`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] without a preceding press.
    pub fn drag(&mut self, pixel: Vec2, timestamp: Duration) -> Result<(), ViewError> {
        let delta = self.state.sample(pixel, timestamp)?;
        self.scheduler.observe(timestamp);
        let moved = match self.state.action() {
            Action::None | Action::ZoomOnRegion => false,
            Action::Rotate => {
                let rotation = deformed_ball_quaternion(
                    self.state.previous_position(),
                    pixel,
                    self.pivot_pixel(),
                    self.screen_size(),
                    self.state.options().rotation_sensitivity,
                );
                self.rotate_about_pivot(rotation);
                self.state.record_rotation(rotation);
                true
            }
            Action::CadRotate => {
                let rotation = self.cad_rotation(delta);
                self.rotate_about_pivot(rotation);
                self.state.record_rotation(rotation);
                true
            }
            Action::ScreenRotate => {
                let angle = screen_rotation_angle(
                    self.state.previous_position(),
                    pixel,
                    self.pivot_pixel(),
                );
                let rotation = Quat::from_rotation_z(angle);
                self.rotate_about_pivot(rotation);
                self.state.record_rotation(rotation);
                true
            }
            Action::Translate => {
                self.pan(Vec2::new(-delta.x, delta.y));
                true
            }
            Action::ScreenTranslate => {
                let locked = match self.state.screen_axis(pixel) {
                    Some(ScreenAxis::Horizontal) => Vec2::new(-delta.x, 0.0),
                    Some(ScreenAxis::Vertical) => Vec2::new(0.0, delta.y),
                    None => Vec2::ZERO,
                };
                self.pan(locked);
                true
            }
            Action::Zoom => {
                let coef = self.zoom_distance(
                    self.camera.distance_to_revolve_around_point(),
                );
                let dz = -coef * delta.y / self.screen_size().y
                    * self.state.options().zoom_sensitivity;
                let dz = self.clamp_zoom_step(dz);
                let _ = self.translate_local(Vec3::new(0.0, 0.0, dz));
                true
            }
            Action::MoveForward | Action::MoveBackward | Action::LookAround => {
                let rotation = self.pitch_yaw(pixel);
                self.camera.frame_mut().rotate(rotation);
                true
            }
            Action::Roll => {
                let angle = PI * delta.x / self.screen_size().x
                    * self.state.options().rotation_sensitivity;
                self.camera.frame_mut().rotate(Quat::from_rotation_z(angle));
                self.scene_up_vector = self.camera.up_vector();
                true
            }
            Action::Drive => {
                let turn = self.state.options().rotation_sensitivity
                    * (self.state.previous_position().x - pixel.x)
                    / self.screen_size().x;
                self.camera.frame_mut().rotate(Quat::from_rotation_y(turn));
                self.drive_speed =
                    DRIVE_THROTTLE * (pixel.y - self.state.press_position().y);
                true
            }
        };
        self.state.commit(pixel);
        if moved {
            self.notify();
        }
        Ok(())
    }

    /// End the gesture at `pixel`. A release away from the last drag
    /// sample counts as a final drag. Fast rotations start spinning, fast
    /// pans start tossing.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] without a preceding press.
    pub fn release(&mut self, pixel: Vec2, timestamp: Duration) -> Result<(), ViewError> {
        if !self.state.is_active() {
            return Err(ViewError::NoActiveGesture);
        }
        if pixel != self.state.previous_position() {
            self.drag(pixel, timestamp)?;
        }
        let action = self.state.action();
        if action == Action::ZoomOnRegion {
            let rect =
                ScreenRect::from_corners(self.state.press_position(), pixel);
            if !rect.is_empty() {
                self.camera.fit_screen_region(&rect);
                self.notify();
            }
        }
        if action.is_fly() {
            self.scheduler.cancel(Timer::Fly);
            self.drive_speed = 0.0;
        }
        let _ = self.state.end(&mut self.scheduler)?;
        Ok(())
    }

    /// Apply `steps` wheel steps as `action`. Returns whether the camera
    /// moved; unsupported actions are ignored.
    pub fn wheel(&mut self, action: Action, steps: f32, timestamp: Duration) -> bool {
        self.scheduler.observe(timestamp);
        let dz = match action {
            Action::Zoom => {
                let coef = self.zoom_distance(
                    self.camera.distance_to_revolve_around_point(),
                );
                self.clamp_zoom_step(
                    -steps
                        * self.state.options().wheel_sensitivity
                        * WHEEL_ZOOM_STEP
                        * coef,
                )
            }
            Action::MoveForward | Action::MoveBackward => {
                -WHEEL_FLY_STEP * self.fly_speed() * steps
            }
            other => {
                log::debug!("wheel ignores {other:?}");
                return false;
            }
        };
        let _ = self.translate_local(Vec3::new(0.0, 0.0, dz));
        self.scheduler
            .schedule_once(Timer::WheelSettle, WHEEL_SETTLE_DELAY);
        self.notify();
        true
    }

    /// Handle a fired timer. Returns `true` when the camera moved or a
    /// redraw is due.
    pub fn on_timer(&mut self, timer: Timer) -> bool {
        let changed = match timer {
            Timer::Spin => match self.state.spin_tick(&mut self.scheduler) {
                Some(rotation) => {
                    self.rotate_about_pivot(rotation);
                    true
                }
                None => false,
            },
            Timer::Toss => match self.state.toss_tick(&mut self.scheduler) {
                Some(translation) => {
                    self.camera.frame_mut().translate(translation);
                    true
                }
                None => false,
            },
            Timer::Fly => self.fly_tick(),
            Timer::WheelSettle => true,
        };
        if changed {
            self.notify();
        }
        changed
    }

    // ── Inertia ──

    /// Whether the camera is spinning.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    /// Whether the camera is being tossed.
    #[must_use]
    pub fn is_tossing(&self) -> bool {
        self.state.is_tossing()
    }

    /// Spin about the pivot by `rotation` (camera coordinates) per tick,
    /// decaying from `speed` under the spinning friction.
    pub fn start_spinning(&mut self, rotation: Quat, speed: f32) {
        self.state
            .start_spinning(rotation, speed, &mut self.scheduler);
    }

    /// Stop spinning.
    pub fn stop_spinning(&mut self) {
        self.state.stop_spinning(&mut self.scheduler);
    }

    /// Stop tossing.
    pub fn stop_tossing(&mut self) {
        self.state.stop_tossing(&mut self.scheduler);
    }

    // ── Pivot & tracking ──

    /// Move the pivot to the scene point under `pixel`, using a depth the
    /// host sampled from its depth buffer. Shows the pivot hint until
    /// `now + 1 s`. Background pixels leave the pivot alone and return
    /// `false`.
    pub fn set_revolve_around_point_from_pixel(
        &mut self,
        pixel: Vec2,
        depth: f32,
        now: Duration,
    ) -> bool {
        let Some(point) = self.camera.point_under_pixel(pixel, depth) else {
            return false;
        };
        self.camera.set_revolve_around_point(point);
        self.pivot_hint.raise(now, PIVOT_HINT_LIFETIME);
        true
    }

    /// Whether the pivot marker should still be drawn at `now`.
    #[must_use]
    pub fn pivot_hint_visible(&self, now: Duration) -> bool {
        self.pivot_hint.is_raised(now)
    }

    /// Place the camera where `target` wants it: at its camera position,
    /// looking at its target, with its up vector. The target becomes the
    /// pivot.
    pub fn track(&mut self, target: &dyn Trackable) {
        self.camera.set_position(target.camera_position());
        self.camera.set_up_vector(target.up_vector(), true);
        self.camera.look_at(target.target());
        self.camera.set_revolve_around_point(target.target());
        self.notify();
    }

    // ── Internals ──

    fn notify(&mut self) {
        if let Some(handler) = self.on_manipulated.as_mut() {
            handler(&self.camera);
        }
    }

    fn screen_size(&self) -> Vec2 {
        Vec2::new(
            self.camera.screen_width() as f32,
            self.camera.screen_height() as f32,
        )
    }

    /// Pixel of the pivot, or the screen center when it cannot be
    /// projected.
    fn pivot_pixel(&self) -> Vec2 {
        self.camera
            .projected_coordinates_of(self.camera.revolve_around_point())
            .map_or(self.screen_size() * 0.5, Vec3::truncate)
    }

    fn zoom_distance(&self, distance: f32) -> f32 {
        distance.max(MIN_ZOOM_DISTANCE_COEFFICIENT * self.camera.scene_radius())
    }

    /// Limit a forward zoom step so an orthographic camera stays in front
    /// of the pivot plane; its view extent shrinks to nothing there.
    fn clamp_zoom_step(&self, dz: f32) -> f32 {
        if dz >= 0.0
            || self.camera.projection_type() != ProjectionType::Orthographic
        {
            return dz;
        }
        let ahead = -self
            .camera
            .camera_coordinates_of(self.camera.revolve_around_point())
            .z;
        let closest =
            self.camera.z_near_coefficient() * self.camera.scene_radius();
        dz.max((closest - ahead).min(0.0))
    }

    fn rotate_about_pivot(&mut self, rotation: Quat) {
        let pivot = self.camera.revolve_around_point();
        self.camera.frame_mut().rotate_around_point(rotation, pivot);
    }

    /// Translate by a camera-space vector.
    fn translate_local(&mut self, local: Vec3) -> Vec3 {
        let delta = self.camera.frame().local_inverse_transform_of(local);
        self.camera.frame_mut().translate(delta);
        delta
    }

    /// Pan by a screen delta (x right, y up) so that scene points at the
    /// pivot depth follow the cursor.
    fn pan(&mut self, screen_delta: Vec2) {
        let ratio = self
            .camera
            .pixel_to_scene_ratio(self.camera.revolve_around_point());
        let local = screen_delta.extend(0.0)
            * ratio
            * self.state.options().translation_sensitivity;
        let applied = self.translate_local(local);
        self.state.record_translation(applied);
    }

    fn cad_rotation(&self, delta: Vec2) -> Quat {
        let (horizontal, vertical) = cad_angles(
            delta,
            self.screen_size(),
            self.state.options().rotation_sensitivity,
        );
        let up = self.camera.frame().transform_of(self.scene_up_vector);
        let yaw = Quat::from_axis_angle_checked(up, -horizontal);
        yaw * Quat::from_rotation_x(-vertical)
    }

    fn pitch_yaw(&self, pixel: Vec2) -> Quat {
        let size = self.screen_size();
        let previous = self.state.previous_position();
        let sensitivity = self.state.options().rotation_sensitivity;
        let pitch = Quat::from_rotation_x(
            sensitivity * (previous.y - pixel.y) / size.y,
        );
        let up = self.camera.frame().transform_of(self.scene_up_vector);
        let yaw = Quat::from_axis_angle_checked(
            up,
            sensitivity * (previous.x - pixel.x) / size.x,
        );
        yaw * pitch
    }

    fn fly_tick(&mut self) -> bool {
        let speed = self.fly_speed();
        let dz = match self.state.action() {
            Action::MoveForward => -speed,
            Action::MoveBackward => speed,
            Action::Drive => speed * self.drive_speed,
            _ => {
                self.scheduler.cancel(Timer::Fly);
                return false;
            }
        };
        let _ = self.translate_local(Vec3::new(0.0, 0.0, dz));
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::interaction::avatar::AvatarFrame;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn camera() -> InteractiveCamera {
        InteractiveCamera::new(Camera::new())
    }

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn fast_rotate_release_spins_and_decays() {
        let mut cam = camera();
        cam.set_spinning_friction(0.5).unwrap();
        let center = Vec2::new(300.0, 200.0);
        cam.press(Action::Rotate, center, ms(0)).unwrap();
        cam.drag(center + Vec2::new(5.0, 0.0), ms(10)).unwrap();
        cam.release(center + Vec2::new(5.0, 0.0), ms(10)).unwrap();
        assert!((cam.state().speed() - 0.5).abs() < 1e-5);
        assert!(cam.is_spinning());
        assert!(cam.scheduler().is_scheduled(Timer::Spin));

        let mut angles = Vec::new();
        for _ in 0..3 {
            angles.push(cam.state().spin().delta().axis_angle().1);
            assert!(cam.on_timer(Timer::Spin));
        }
        assert!(angles[0] > angles[1] && angles[1] > angles[2], "{angles:?}");
    }

    #[test]
    fn slow_release_does_not_spin() {
        let mut cam = camera();
        let center = Vec2::new(300.0, 200.0);
        cam.press(Action::Rotate, center, ms(0)).unwrap();
        cam.drag(center + Vec2::new(1.0, 0.0), ms(20)).unwrap();
        cam.release(center + Vec2::new(1.0, 0.0), ms(20)).unwrap();
        assert!(!cam.is_spinning());
    }

    #[test]
    fn rotation_keeps_pivot_distance() {
        let mut cam = camera();
        let pivot = cam.camera().revolve_around_point();
        let before = (cam.camera().position() - pivot).length();
        cam.press(Action::Rotate, Vec2::new(250.0, 150.0), ms(0)).unwrap();
        cam.drag(Vec2::new(320.0, 260.0), ms(100)).unwrap();
        cam.release(Vec2::new(320.0, 260.0), ms(200)).unwrap();
        let after = (cam.camera().position() - pivot).length();
        assert!((before - after).abs() < 1e-4);
        // The pivot stays on screen where it was.
        let projected = cam.camera().projected_coordinates_of(pivot).unwrap();
        assert!((projected.truncate() - Vec2::new(300.0, 200.0)).length() < 0.5);
    }

    #[test]
    fn pan_moves_pivot_with_cursor() {
        let mut cam = camera();
        let pivot = cam.camera().revolve_around_point();
        cam.press(Action::Translate, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(340.0, 170.0), ms(500)).unwrap();
        cam.release(Vec2::new(340.0, 170.0), ms(500)).unwrap();
        let projected = cam.camera().projected_coordinates_of(pivot).unwrap();
        assert!(
            (projected.truncate() - Vec2::new(340.0, 170.0)).length() < 0.5,
            "{projected:?}"
        );
        assert!(!cam.is_tossing());
    }

    #[test]
    fn fast_pan_tosses_until_rest() {
        let mut cam = camera();
        cam.set_tossing_friction(0.8).unwrap();
        cam.press(Action::Translate, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(320.0, 200.0), ms(10)).unwrap();
        cam.release(Vec2::new(320.0, 200.0), ms(10)).unwrap();
        assert!(cam.is_tossing());

        let start = cam.camera().position();
        assert!(cam.run_due_timers(ms(1000)));
        assert!(!cam.is_tossing());
        assert!(!cam.scheduler().is_scheduled(Timer::Toss));
        // Dragging right pans the camera left.
        assert!(cam.camera().position().x < start.x);
    }

    #[test]
    fn zero_friction_spins_forever() {
        let mut cam = camera();
        cam.start_spinning(Quat::from_rotation_y(0.01), 1.0);
        assert!(cam.run_due_timers(ms(2000)));
        assert!(cam.is_spinning());
        let delta = cam.state().spin().delta().axis_angle().1;
        assert!((delta - 0.01).abs() < 1e-5);
    }

    #[test]
    fn press_stops_spin_and_cancels_timer() {
        let mut cam = camera();
        cam.start_spinning(Quat::from_rotation_y(0.01), 1.0);
        cam.press(Action::Zoom, Vec2::ZERO, ms(5)).unwrap();
        assert!(!cam.is_spinning());
        assert!(!cam.scheduler().is_scheduled(Timer::Spin));
        assert!(!cam.on_timer(Timer::Spin));
    }

    #[test]
    fn protocol_errors() {
        let mut cam = camera();
        assert!(matches!(
            cam.drag(Vec2::ZERO, ms(0)),
            Err(ViewError::NoActiveGesture)
        ));
        assert!(matches!(
            cam.release(Vec2::ZERO, ms(0)),
            Err(ViewError::NoActiveGesture)
        ));
        cam.press(Action::Rotate, Vec2::ZERO, ms(0)).unwrap();
        assert!(matches!(
            cam.press(Action::Translate, Vec2::ZERO, ms(1)),
            Err(ViewError::GestureInProgress)
        ));
    }

    #[test]
    fn drag_zoom_moves_along_view_axis() {
        let mut cam = camera();
        let dir = cam.camera().view_direction();
        let before = cam.camera().distance_to_revolve_around_point();
        cam.press(Action::Zoom, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(300.0, 240.0), ms(100)).unwrap();
        let after = cam.camera().distance_to_revolve_around_point();
        let expected = before.max(0.2) * 40.0 / 400.0;
        assert!((before - after - expected).abs() < 1e-4);
        assert!(approx(cam.camera().view_direction(), dir, 1e-6));
    }

    #[test]
    fn ortho_drag_zoom_stops_in_front_of_pivot() {
        let mut cam = camera();
        cam.camera_mut()
            .set_projection_type(ProjectionType::Orthographic);
        let closest =
            cam.camera().z_near_coefficient() * cam.camera().scene_radius();
        cam.press(Action::Zoom, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(300.0, 600.0), ms(100)).unwrap();
        let distance = cam.camera().distance_to_revolve_around_point();
        assert!((distance - closest).abs() < 1e-4, "{distance}");
        assert!(cam.camera().projection_matrix().is_finite());

        cam.drag(Vec2::new(300.0, 900.0), ms(200)).unwrap();
        let distance = cam.camera().distance_to_revolve_around_point();
        assert!((distance - closest).abs() < 1e-4, "{distance}");
        let center = cam.camera().projected_coordinates_of(Vec3::ZERO).unwrap();
        assert!((center.truncate() - Vec2::new(300.0, 200.0)).length() < 1e-2);
    }

    #[test]
    fn ortho_wheel_zoom_stops_in_front_of_pivot() {
        let mut cam = camera();
        cam.camera_mut()
            .set_projection_type(ProjectionType::Orthographic);
        for step in 0..100 {
            assert!(cam.wheel(Action::Zoom, 5.0, ms(step * 10)));
        }
        assert!(cam.camera().distance_to_revolve_around_point() > 0.0);
        assert!(cam.camera().projection_matrix().is_finite());
    }

    #[test]
    fn wheel_step_matches_drag_with_off_axis_pivot() {
        let pivot = Vec3::new(1.5, 0.0, 0.0);
        let mut wheeled = camera();
        wheeled.camera_mut().set_revolve_around_point(pivot);
        let mut dragged = camera();
        dragged.camera_mut().set_revolve_around_point(pivot);
        let start = wheeled.camera().position();

        assert!(wheeled.wheel(Action::Zoom, 1.0, ms(0)));
        // One wheel step equals a drag over a tenth of the screen height.
        dragged
            .press(Action::Zoom, Vec2::new(300.0, 200.0), ms(0))
            .unwrap();
        dragged.drag(Vec2::new(300.0, 240.0), ms(100)).unwrap();

        let moved = (wheeled.camera().position() - start).length();
        let depth = dragged.camera().distance_to_revolve_around_point();
        assert!(moved > 0.0);
        assert!(approx(
            wheeled.camera().position(),
            dragged.camera().position(),
            1e-5
        ));
        // Scaled by depth along the view axis, not the slant distance.
        assert!((moved - 0.1 * (depth + moved)).abs() < 1e-4);
    }

    #[test]
    fn wheel_zoom_restarts_settle_timer_once() {
        let mut cam = camera();
        let before = cam.camera().distance_to_revolve_around_point();
        assert!(cam.wheel(Action::Zoom, 1.0, ms(0)));
        assert!(cam.camera().distance_to_revolve_around_point() < before);
        assert!(!cam.wheel(Action::Rotate, 1.0, ms(0)));

        let redraws = Rc::new(Cell::new(0));
        let counter = Rc::clone(&redraws);
        cam.set_on_manipulated(move |_| counter.set(counter.get() + 1));

        assert!(!cam.run_due_timers(ms(300)));
        assert!(cam.wheel(Action::Zoom, -1.0, ms(300)));
        assert_eq!(redraws.get(), 1);
        // The second step pushed the deadline to 700 ms.
        assert!(!cam.run_due_timers(ms(600)));
        assert!(cam.run_due_timers(ms(700)));
        assert_eq!(redraws.get(), 2);
        assert!(!cam.run_due_timers(ms(5000)));
        assert_eq!(redraws.get(), 2);
    }

    #[test]
    fn fly_forward_moves_while_held() {
        let mut cam = camera();
        let dir = cam.camera().view_direction();
        let start = cam.camera().position();
        let press = Vec2::new(300.0, 200.0);
        cam.press(Action::MoveForward, press, ms(0)).unwrap();
        assert!(cam.run_due_timers(ms(100)));
        let step = cam.fly_speed();
        let moved = cam.camera().position() - start;
        assert!((moved.dot(dir) - 10.0 * step).abs() < 1e-4);

        cam.release(press, ms(100)).unwrap();
        assert!(!cam.scheduler().is_scheduled(Timer::Fly));
        let parked = cam.camera().position();
        assert!(!cam.run_due_timers(ms(300)));
        assert_eq!(cam.camera().position(), parked);
    }

    #[test]
    fn drive_throttle_follows_vertical_offset() {
        let mut cam = camera();
        cam.press(Action::Drive, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(300.0, 150.0), ms(10)).unwrap();
        assert!((cam.drive_speed() + 0.5).abs() < 1e-6);
        let start = cam.camera().position();
        let dir = cam.camera().view_direction();
        assert!(cam.run_due_timers(ms(20)));
        assert!((cam.camera().position() - start).dot(dir) > 0.0);
    }

    #[test]
    fn look_around_keeps_position() {
        let mut cam = camera();
        let start = cam.camera().position();
        let dir = cam.camera().view_direction();
        cam.press(Action::LookAround, Vec2::new(300.0, 200.0), ms(0)).unwrap();
        cam.drag(Vec2::new(360.0, 200.0), ms(50)).unwrap();
        assert_eq!(cam.camera().position(), start);
        let turned = cam.camera().view_direction();
        assert!(turned.x > dir.x, "dragging right looks right");
    }

    #[test]
    fn screen_translate_locks_axis() {
        let mut cam = camera();
        let start = cam.camera().position();
        cam.press(Action::ScreenTranslate, Vec2::new(300.0, 200.0), ms(0))
            .unwrap();
        cam.drag(Vec2::new(310.0, 203.0), ms(100)).unwrap();
        cam.drag(Vec2::new(320.0, 230.0), ms(200)).unwrap();
        let moved = cam.camera().position() - start;
        assert!(moved.x.abs() > 0.0);
        assert!(moved.y.abs() < 1e-6);
    }

    #[test]
    fn zoom_on_region_fits_rectangle() {
        let mut cam = camera();
        let before = cam.camera().distance_to_revolve_around_point();
        cam.press(Action::ZoomOnRegion, Vec2::new(270.0, 180.0), ms(0))
            .unwrap();
        cam.drag(Vec2::new(300.0, 200.0), ms(50)).unwrap();
        cam.release(Vec2::new(330.0, 220.0), ms(100)).unwrap();
        assert!(cam.camera().distance_to_revolve_around_point() < before);
    }

    #[test]
    fn pivot_from_pixel_raises_hint() {
        let mut cam = camera();
        assert!(!cam.set_revolve_around_point_from_pixel(
            Vec2::new(300.0, 200.0),
            1.0,
            ms(0)
        ));
        let window = cam
            .camera()
            .projected_coordinates_of(Vec3::new(0.2, 0.1, 0.0))
            .unwrap();
        assert!(cam.set_revolve_around_point_from_pixel(
            window.truncate(),
            window.z,
            ms(100)
        ));
        assert!(approx(
            cam.camera().revolve_around_point(),
            Vec3::new(0.2, 0.1, 0.0),
            1e-3
        ));
        assert!(cam.pivot_hint_visible(ms(1099)));
        assert!(!cam.pivot_hint_visible(ms(1100)));
    }

    #[test]
    fn tracking_an_avatar_looks_at_it() {
        let mut cam = camera();
        let avatar = AvatarFrame::new(Vec3::new(4.0, 0.0, -2.0), 5.0);
        cam.track(&avatar);
        assert!(approx(cam.camera().position(), avatar.camera_position(), 1e-5));
        let to_target = (avatar.target() - cam.camera().position()).normalize();
        assert!(approx(cam.camera().view_direction(), to_target, 1e-4));
        assert!(approx(cam.camera().revolve_around_point(), avatar.target(), 1e-6));
    }

    #[test]
    fn invalid_friction_options_are_reported() {
        let mut cam = camera();
        let mut options = Options::default();
        options.manipulation.spinning_friction = 2.0;
        options.camera.fov_degrees = 60.0;
        assert!(cam.apply_options(&options).is_err());
        assert!((cam.camera().field_of_view().to_degrees() - 60.0).abs() < 1e-4);
        assert_eq!(cam.options().spinning_friction, 0.0);
    }
}
