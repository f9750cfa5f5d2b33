use chrono::{DateTime, Duration, Utc};

/// Upper bound on the quiet window; longer settings are clamped.
pub const MAX_WINDOW_MS: u64 = 60_000;

/// Coalesces bursts of edits into a single recomputation.
///
/// Each `notify` pushes the deadline out to `now + window`; `poll` fires once
/// the deadline has passed and then disarms until the next `notify`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<DateTime<Utc>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::milliseconds(millis.min(MAX_WINDOW_MS) as i64))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an edit at `now`, superseding any pending deadline.
    pub fn notify(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns `true` exactly once per quiet period, when `now` reaches the deadline.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline; returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::from_millis(crate::config::DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::<Utc>::default() + Duration::milliseconds(millis)
    }

    #[test]
    fn fires_once_after_quiet_window() {
        let mut debouncer = Debouncer::from_millis(200);
        debouncer.notify(at(0));
        assert!(!debouncer.poll(at(199)));
        assert!(debouncer.poll(at(200)));
        assert!(!debouncer.poll(at(500)));
    }

    #[test]
    fn later_edit_supersedes_pending_deadline() {
        let mut debouncer = Debouncer::from_millis(200);
        debouncer.notify(at(0));
        debouncer.notify(at(150));
        assert!(!debouncer.poll(at(250)));
        assert!(debouncer.poll(at(350)));
    }

    #[test]
    fn oversized_window_is_clamped() {
        let debouncer = Debouncer::from_millis(u64::MAX);
        assert_eq!(debouncer.window(), Duration::milliseconds(MAX_WINDOW_MS as i64));
    }

    #[test]
    fn cancel_disarms() {
        let mut debouncer = Debouncer::from_millis(200);
        assert!(!debouncer.cancel());
        debouncer.notify(at(0));
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(at(1_000)));
    }
}
