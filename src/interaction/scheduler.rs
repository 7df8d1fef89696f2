//! Deferred and periodic callbacks.
//!
//! Inertia, fly motion and the wheel settle delay all need "call me back
//! later". The manipulators never own a clock: they ask a [`Scheduler`] to
//! arm a [`Timer`] and the host feeds fired timers back through
//! `on_timer`. [`ManualScheduler`] is the default implementation, driven
//! by timestamps the host passes in.

use std::time::Duration;

/// Timer tokens a manipulator can arm. At most one of each is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Spin inertia tick.
    Spin,
    /// Toss inertia tick.
    Toss,
    /// Fly/drive motion tick.
    Fly,
    /// One-shot delay after the last wheel step.
    WheelSettle,
}

/// Arms and cancels timers on behalf of a manipulator.
///
/// Arming a timer that is already pending replaces it.
pub trait Scheduler {
    /// Fire `timer` every `interval` until cancelled.
    fn schedule_repeating(&mut self, timer: Timer, interval: Duration);

    /// Fire `timer` once after `delay`.
    fn schedule_once(&mut self, timer: Timer, delay: Duration);

    /// Disarm `timer`. No-op when it is not pending.
    fn cancel(&mut self, timer: Timer);

    /// Host time carried by an input event. Schedulers with their own
    /// clock ignore it.
    fn observe(&mut self, _now: Duration) {}
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    timer: Timer,
    due: Duration,
    interval: Option<Duration>,
}

/// Scheduler driven by host-supplied time.
///
/// Input timestamps move its clock forward through
/// [`Scheduler::observe`]. Call [`advance_to`](Self::advance_to) with the
/// host clock between events, then drain
/// [`pop_due`](Self::pop_due) and hand each timer to the manipulator.
/// Draining one timer at a time means a cancellation made while handling
/// a tick is honoured before the next pop.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    entries: Vec<Entry>,
}

impl ManualScheduler {
    /// Empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward. Earlier times are ignored.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Whether `timer` is armed.
    #[must_use]
    pub fn is_scheduled(&self, timer: Timer) -> bool {
        self.entries.iter().any(|e| e.timer == timer)
    }

    /// Earliest due time among armed timers.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest timer due at or before the current
    /// time. Repeating timers are re-armed one interval later.
    pub fn pop_due(&mut self) -> Option<Timer> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= self.now)
            .min_by_key(|(_, e)| e.due)?;
        let entry = self.entries[index];
        match entry.interval {
            Some(interval) => self.entries[index].due = entry.due + interval,
            None => {
                let _ = self.entries.swap_remove(index);
            }
        }
        Some(entry.timer)
    }

    fn arm(&mut self, timer: Timer, delay: Duration, interval: Option<Duration>) {
        self.cancel(timer);
        self.entries.push(Entry {
            timer,
            due: self.now + delay,
            interval,
        });
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, timer: Timer, interval: Duration) {
        // A zero interval would fire forever within one drain.
        let interval = interval.max(Duration::from_millis(1));
        self.arm(timer, interval, Some(interval));
    }

    fn schedule_once(&mut self, timer: Timer, delay: Duration) {
        self.arm(timer, delay, None);
    }

    fn cancel(&mut self, timer: Timer) {
        self.entries.retain(|e| e.timer != timer);
    }

    fn observe(&mut self, now: Duration) {
        self.advance_to(now);
    }
}
