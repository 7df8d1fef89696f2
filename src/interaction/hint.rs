use std::time::Duration;

/// A flag that lowers itself once its deadline passes.
///
/// Used for transient visual hints (the revolve-around point marker) on
/// host time without owning a timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiringFlag {
    deadline: Option<Duration>,
}

impl ExpiringFlag {
    /// Raise the flag until `now + lifetime`.
    pub fn raise(&mut self, now: Duration, lifetime: Duration) {
        self.deadline = Some(now + lifetime);
    }

    /// Lower the flag.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// Whether the flag is still up at `now`.
    #[must_use]
    pub fn is_raised(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_at_deadline() {
        let mut flag = ExpiringFlag::default();
        assert!(!flag.is_raised(Duration::ZERO));
        flag.raise(Duration::from_millis(200), Duration::from_secs(1));
        assert!(flag.is_raised(Duration::from_millis(1199)));
        assert!(!flag.is_raised(Duration::from_millis(1200)));
        flag.raise(Duration::from_millis(200), Duration::from_secs(1));
        flag.clear();
        assert!(!flag.is_raised(Duration::from_millis(300)));
    }
}
