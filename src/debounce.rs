use std::time::{Duration, Instant};

/// Trailing debounce for the search input: holds the latest value until it
/// has been stable for the quiet period, then releases it exactly once.
/// Intermediate values are never observable.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<String>,
    last_change: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            last_change: None,
        }
    }

    /// Record a new input value. Resets the quiet-period timer.
    pub fn update(&mut self, value: String) {
        self.pending = Some(value);
        self.last_change = Some(Instant::now());
    }

    /// Returns the settled value once the quiet period has elapsed since the
    /// last change, clearing it so it is released at most once.
    pub fn poll_settled(&mut self) -> Option<String> {
        match self.last_change {
            Some(at) if at.elapsed() >= self.quiet_period => {
                self.last_change = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending value settles. Used to size the event
    /// poll timeout so settling does not wait for the next input event.
    pub fn time_until_settled(&self) -> Option<Duration> {
        let at = self.last_change?;
        Some(self.quiet_period.saturating_sub(at.elapsed()))
    }

    /// Drop any pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;

    #[test]
    fn test_nothing_pending_initially() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        assert!(!d.is_pending());
        assert!(d.poll_settled().is_none());
        assert!(d.time_until_settled().is_none());
    }

    #[test]
    fn test_does_not_settle_before_quiet_period() {
        let mut d = Debouncer::new(Duration::from_secs(60));
        d.update("batman".to_string());
        assert!(d.is_pending());
        assert!(d.poll_settled().is_none());
        assert!(d.is_pending());
    }

    #[test]
    fn test_settles_once_after_quiet_period() {
        let mut d = Debouncer::new(Duration::from_millis(5));
        d.update("batman".to_string());
        thread::sleep(Duration::from_millis(10));

        assert_eq!(d.poll_settled(), Some("batman".to_string()));
        // Released exactly once.
        assert!(d.poll_settled().is_none());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_rapid_edits_emit_only_the_last_value() {
        let mut d = Debouncer::new(Duration::from_millis(20));
        d.update("b".to_string());
        d.update("ba".to_string());
        d.update("bat".to_string());
        assert!(d.poll_settled().is_none());

        thread::sleep(Duration::from_millis(40));
        assert_eq!(d.poll_settled(), Some("bat".to_string()));
        assert!(d.poll_settled().is_none());
    }

    #[test]
    fn test_edit_resets_the_timer() {
        let mut d = Debouncer::new(Duration::from_millis(40));
        d.update("b".to_string());
        thread::sleep(Duration::from_millis(25));
        d.update("ba".to_string());
        // 25ms into the first timer, but only 0ms into the reset one.
        assert!(d.poll_settled().is_none());
        thread::sleep(Duration::from_millis(60));
        assert_eq!(d.poll_settled(), Some("ba".to_string()));
    }

    #[test]
    fn test_cancel_discards_pending_value() {
        let mut d = Debouncer::new(Duration::from_millis(1));
        d.update("batman".to_string());
        d.cancel();
        thread::sleep(Duration::from_millis(5));
        assert!(d.poll_settled().is_none());
    }

    #[test]
    fn test_time_until_settled_counts_down() {
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.update("x".to_string());
        let remaining = d.time_until_settled().unwrap();
        assert!(remaining <= Duration::from_millis(100));
    }

    proptest! {
        /// For any burst of edits, the last one typed is the one released.
        #[test]
        fn prop_last_edit_wins(values in proptest::collection::vec(".{0,12}", 1..20)) {
            let mut d = Debouncer::new(Duration::ZERO);
            for v in &values {
                d.update(v.clone());
            }
            prop_assert_eq!(d.poll_settled(), values.last().cloned());
            prop_assert_eq!(d.poll_settled(), None);
        }
    }
}
