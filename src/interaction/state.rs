//! Per-gesture bookkeeping shared by every manipulator.
//!
//! [`ManipulationState`] tracks the bound action, press and previous
//! pixels, drag speed and the spin/toss inertia, and owns the
//! [`ManipulationOptions`] that tune them. It knows nothing about what is
//! being moved; the camera and object manipulators turn its deltas into
//! frame motion.

use std::time::Duration;

use glam::{Quat, Vec2, Vec3};

use super::action::Action;
use super::inertia::{Inertia, Tick};
use super::scheduler::{Scheduler, Timer};
use crate::error::ViewError;
use crate::options::{
    check_friction, ManipulationOptions, SPINNING_FRICTION_RANGE,
    TOSSING_FRICTION_RANGE,
};

/// Shortest interval used for speed and inertia timing.
const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Screen axis chosen by a direction-locked translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAxis {
    /// Locked to horizontal motion.
    Horizontal,
    /// Locked to vertical motion.
    Vertical,
}

/// Gesture session and inertia state.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    options: ManipulationOptions,
    action: Action,
    press_position: Vec2,
    previous_position: Vec2,
    last_timestamp: Duration,
    last_interval: Duration,
    speed: f32,
    direction_lock: Option<ScreenAxis>,
    last_rotation: Quat,
    last_translation: Vec3,
    spin: Inertia<Quat>,
    toss: Inertia<Vec3>,
}

impl Default for ManipulationState {
    fn default() -> Self {
        Self::new(ManipulationOptions::default())
    }
}

impl ManipulationState {
    /// Idle state using `options`. Invalid frictions fall back to their
    /// defaults.
    #[must_use]
    pub fn new(options: ManipulationOptions) -> Self {
        let mut state = Self {
            options: ManipulationOptions::default(),
            action: Action::None,
            press_position: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            last_timestamp: Duration::ZERO,
            last_interval: MIN_SAMPLE_INTERVAL,
            speed: 0.0,
            direction_lock: None,
            last_rotation: Quat::IDENTITY,
            last_translation: Vec3::ZERO,
            spin: Inertia::new(Quat::IDENTITY),
            toss: Inertia::new(Vec3::ZERO),
        };
        let _ = state.apply_options(&options);
        state
    }

    // ── Options ──

    /// Current tuning.
    #[must_use]
    pub fn options(&self) -> &ManipulationOptions {
        &self.options
    }

    /// Replace the tuning. Out-of-range frictions are rejected and keep
    /// their previous values; everything else is applied regardless.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] if either friction was
    /// rejected.
    pub fn apply_options(
        &mut self,
        options: &ManipulationOptions,
    ) -> Result<(), ViewError> {
        let spinning = self.options.spinning_friction;
        let tossing = self.options.tossing_friction;
        self.options = options.clone();
        self.options.spinning_friction = spinning;
        self.options.tossing_friction = tossing;
        let spin = self.set_spinning_friction(options.spinning_friction);
        let toss = self.set_tossing_friction(options.tossing_friction);
        spin.and(toss)
    }

    /// Set the spin friction, accepted in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] and keeps the previous
    /// value when `friction` is outside the accepted range.
    pub fn set_spinning_friction(&mut self, friction: f32) -> Result<(), ViewError> {
        self.options.spinning_friction =
            check_friction(friction, SPINNING_FRICTION_RANGE)?;
        Ok(())
    }

    /// Set the toss friction, accepted in `[0.01, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::FrictionOutOfRange`] and keeps the previous
    /// value when `friction` is outside the accepted range.
    pub fn set_tossing_friction(&mut self, friction: f32) -> Result<(), ViewError> {
        self.options.tossing_friction =
            check_friction(friction, TOSSING_FRICTION_RANGE)?;
        Ok(())
    }

    /// Set the arcball/pitch/yaw gain.
    pub fn set_rotation_sensitivity(&mut self, sensitivity: f32) {
        self.options.rotation_sensitivity = sensitivity;
    }

    /// Set the pan gain.
    pub fn set_translation_sensitivity(&mut self, sensitivity: f32) {
        self.options.translation_sensitivity = sensitivity;
    }

    /// Set the spin release threshold (pixels per millisecond).
    pub fn set_spinning_sensitivity(&mut self, sensitivity: f32) {
        self.options.spinning_sensitivity = sensitivity;
    }

    /// Set the toss release threshold (pixels per millisecond).
    pub fn set_tossing_sensitivity(&mut self, sensitivity: f32) {
        self.options.tossing_sensitivity = sensitivity;
    }

    /// Set the wheel gain.
    pub fn set_wheel_sensitivity(&mut self, sensitivity: f32) {
        self.options.wheel_sensitivity = sensitivity;
    }

    /// Set the drag-zoom gain.
    pub fn set_zoom_sensitivity(&mut self, sensitivity: f32) {
        self.options.zoom_sensitivity = sensitivity;
    }

    /// Override the fly step. `None` derives it from the scene radius.
    pub fn set_fly_speed(&mut self, speed: Option<f32>) {
        self.options.fly_speed = speed;
    }

    // ── Gesture ──

    /// Bound action, [`Action::None`] between gestures.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.action != Action::None
    }

    /// Pixel where the gesture started.
    #[must_use]
    pub fn press_position(&self) -> Vec2 {
        self.press_position
    }

    /// Pixel of the last committed drag sample.
    #[must_use]
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Drag speed at the last sample, in pixels per millisecond.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Interval between the last two samples, at least 1 ms.
    #[must_use]
    pub fn last_interval(&self) -> Duration {
        self.last_interval
    }

    /// Start a gesture. Any running inertia is stopped first.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::GestureInProgress`] while another gesture is
    /// active.
    pub fn begin<S: Scheduler + ?Sized>(
        &mut self,
        action: Action,
        pixel: Vec2,
        timestamp: Duration,
        scheduler: &mut S,
    ) -> Result<(), ViewError> {
        if self.is_active() {
            return Err(ViewError::GestureInProgress);
        }
        self.stop_spinning(scheduler);
        self.stop_tossing(scheduler);
        self.action = action;
        self.press_position = pixel;
        self.previous_position = pixel;
        self.last_timestamp = timestamp;
        self.last_interval = MIN_SAMPLE_INTERVAL;
        self.speed = 0.0;
        self.direction_lock = None;
        self.last_rotation = Quat::IDENTITY;
        self.last_translation = Vec3::ZERO;
        if action != Action::None {
            log::debug!("gesture {action:?} started at {pixel}");
        }
        Ok(())
    }

    /// Measure a drag sample: updates speed and timing and returns the
    /// pixel delta since the previous sample. The previous position moves
    /// only on [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] outside a gesture.
    pub fn sample(
        &mut self,
        pixel: Vec2,
        timestamp: Duration,
    ) -> Result<Vec2, ViewError> {
        if !self.is_active() {
            return Err(ViewError::NoActiveGesture);
        }
        let delta = pixel - self.previous_position;
        let interval = timestamp
            .saturating_sub(self.last_timestamp)
            .max(MIN_SAMPLE_INTERVAL);
        self.speed = delta.length() / (interval.as_secs_f32() * 1000.0);
        self.last_interval = interval;
        self.last_timestamp = timestamp;
        Ok(delta)
    }

    /// Make `pixel` the previous position for the next sample.
    pub fn commit(&mut self, pixel: Vec2) {
        self.previous_position = pixel;
    }

    /// Axis chosen by a direction-locked translation. Decided on the first
    /// sample where the horizontal and vertical offsets since press differ,
    /// then kept for the rest of the gesture.
    pub fn screen_axis(&mut self, pixel: Vec2) -> Option<ScreenAxis> {
        if self.direction_lock.is_none() {
            let offset = (pixel - self.press_position).abs();
            if offset.x > offset.y {
                self.direction_lock = Some(ScreenAxis::Horizontal);
            } else if offset.y > offset.x {
                self.direction_lock = Some(ScreenAxis::Vertical);
            }
        }
        self.direction_lock
    }

    /// Remember the rotation applied by the latest sample; spins reuse it.
    pub fn record_rotation(&mut self, rotation: Quat) {
        self.last_rotation = rotation;
    }

    /// Remember the translation applied by the latest sample; tosses
    /// reuse it.
    pub fn record_translation(&mut self, translation: Vec3) {
        self.last_translation = translation;
    }

    /// End the gesture, starting a spin or toss when the release is fast
    /// enough. Returns the action that ended.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoActiveGesture`] outside a gesture.
    pub fn end<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Result<Action, ViewError> {
        if !self.is_active() {
            return Err(ViewError::NoActiveGesture);
        }
        let action = std::mem::take(&mut self.action);
        if action.is_rotation()
            && self.speed >= self.options.spinning_sensitivity
            && self.last_rotation != Quat::IDENTITY
        {
            self.start_spinning(self.last_rotation, self.speed, scheduler);
        } else if action.is_translation()
            && self.speed >= self.options.tossing_sensitivity
            && self.last_translation != Vec3::ZERO
        {
            self.start_tossing(self.last_translation, self.speed, scheduler);
        }
        log::debug!("gesture {action:?} ended at speed {:.3}", self.speed);
        Ok(action)
    }

    // ── Inertia ──

    /// Spin inertia.
    #[must_use]
    pub fn spin(&self) -> &Inertia<Quat> {
        &self.spin
    }

    /// Toss inertia.
    #[must_use]
    pub fn toss(&self) -> &Inertia<Vec3> {
        &self.toss
    }

    /// Whether a spin is running.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin.is_active()
    }

    /// Whether a toss is running.
    #[must_use]
    pub fn is_tossing(&self) -> bool {
        self.toss.is_active()
    }

    /// Spin by `rotation` per tick, ticking every
    /// [`last_interval`](Self::last_interval).
    pub fn start_spinning<S: Scheduler + ?Sized>(
        &mut self,
        rotation: Quat,
        speed: f32,
        scheduler: &mut S,
    ) {
        log::debug!("spin started at {speed:.3} px/ms");
        self.spin.start(rotation, speed);
        scheduler.schedule_repeating(Timer::Spin, self.last_interval);
    }

    /// Toss by `translation` per tick, ticking every
    /// [`last_interval`](Self::last_interval).
    pub fn start_tossing<S: Scheduler + ?Sized>(
        &mut self,
        translation: Vec3,
        speed: f32,
        scheduler: &mut S,
    ) {
        log::debug!("toss started at {speed:.3} px/ms");
        self.toss.start(translation, speed);
        scheduler.schedule_repeating(Timer::Toss, self.last_interval);
    }

    /// Stop spinning. The timer is cancelled before the flag drops so no
    /// tick can observe a half-stopped spin.
    pub fn stop_spinning<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        scheduler.cancel(Timer::Spin);
        self.spin.stop();
    }

    /// Stop tossing, cancelling the timer first.
    pub fn stop_tossing<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        scheduler.cancel(Timer::Toss);
        self.toss.stop();
    }

    /// Advance the spin; returns the rotation to apply this tick.
    pub fn spin_tick<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Option<Quat> {
        match self.spin.tick(self.options.spinning_friction) {
            Tick::Idle => None,
            Tick::Continue(rotation) => Some(rotation),
            Tick::Last(rotation) => {
                self.stop_spinning(scheduler);
                Some(rotation)
            }
        }
    }

    /// Advance the toss; returns the translation to apply this tick.
    pub fn toss_tick<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Option<Vec3> {
        match self.toss.tick(self.options.tossing_friction) {
            Tick::Idle => None,
            Tick::Continue(translation) => Some(translation),
            Tick::Last(translation) => {
                self.stop_tossing(scheduler);
                Some(translation)
            }
        }
    }
}
