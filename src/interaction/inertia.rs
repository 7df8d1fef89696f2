//! Post-release motion that decays with friction.
//!
//! On every tick the stored delta is applied unchanged, then the speed is
//! damped by `friction³` and the delta rescaled by the speed ratio. The
//! cubic mapping keeps low friction values usable: 0.5 already loses an
//! eighth of the speed per tick.

use glam::{Quat, Vec3};

use crate::math::QuatExt;

/// Speed below which inertia stops, in pixels per millisecond.
pub const REST_SPEED: f32 = 0.001;

/// An incremental motion whose magnitude can be rescaled.
pub trait InertialDelta: Copy {
    /// The same motion with its magnitude multiplied by `ratio`.
    #[must_use]
    fn scaled(self, ratio: f32) -> Self;
}

impl InertialDelta for Quat {
    fn scaled(self, ratio: f32) -> Self {
        let (axis, angle) = self.axis_angle();
        Self::from_axis_angle_checked(axis, angle * ratio)
    }
}

impl InertialDelta for Vec3 {
    fn scaled(self, ratio: f32) -> Self {
        self * ratio
    }
}

/// Result of one inertia tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick<D> {
    /// Inertia is not running.
    Idle,
    /// Apply the delta; more ticks follow.
    Continue(D),
    /// Apply the delta; the motion has come to rest and should be stopped.
    Last(D),
}

/// Decaying spin (`Inertia<Quat>`) or toss (`Inertia<Vec3>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia<D> {
    delta: D,
    speed: f32,
    active: bool,
}

impl<D: InertialDelta> Inertia<D> {
    /// Idle inertia holding `rest` as its delta.
    #[must_use]
    pub const fn new(rest: D) -> Self {
        Self {
            delta: rest,
            speed: 0.0,
            active: false,
        }
    }

    /// Whether ticks are applying motion.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Delta applied by the next tick.
    #[must_use]
    pub const fn delta(&self) -> D {
        self.delta
    }

    /// Current speed in pixels per millisecond.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Start applying `delta` on every tick, decaying from `speed`.
    pub fn start(&mut self, delta: D, speed: f32) {
        self.delta = delta;
        self.speed = speed;
        self.active = true;
    }

    /// Stop immediately.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance one tick under `friction` in `[0, 1]`.
    pub fn tick(&mut self, friction: f32) -> Tick<D> {
        if !self.active {
            return Tick::Idle;
        }
        let applied = self.delta;
        if friction <= 0.0 {
            return Tick::Continue(applied);
        }
        let previous = self.speed;
        self.speed *= 1.0 - friction.powi(3);
        if self.speed < REST_SPEED || previous <= 0.0 {
            self.speed = 0.0;
            return Tick::Last(applied);
        }
        self.delta = applied.scaled(self.speed / previous);
        Tick::Continue(applied)
    }
}
