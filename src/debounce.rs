use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Debouncer: keep only the last request of a burst
// ---------------------------------------------------------------------------

/// Coalesces bursts of requests into one.
///
/// Each [`request`](Debouncer::request) cancels whatever was pending and
/// re-arms the timer. [`poll`](Debouncer::poll) hands out the surviving value
/// once the quiescence window has elapsed without a newer request.
/// Superseded values are dropped, never queued.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    /// Schedule `value` to fire at `now + delay`, replacing any pending value.
    pub fn request(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(self.pending, Some((_, deadline)) if now >= deadline);
        if due {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(v, _)| v)
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, d)| *d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn burst_collapses_to_last_request() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);

        d.request(("mod350", "1"), t0);
        d.request(("mod350", "2"), t0 + Duration::from_millis(50));
        d.request(("mod350", "3"), t0 + Duration::from_millis(100));

        let mut fired = Vec::new();
        for ms in (0..1000).step_by(10) {
            if let Some(v) = d.poll(t0 + Duration::from_millis(ms)) {
                fired.push((ms, v));
            }
        }
        assert_eq!(fired, vec![(400, ("mod350", "3"))]);
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.request(7, t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.pending(), Some(&7));
        assert_eq!(d.deadline(), Some(t0 + WINDOW));
        assert_eq!(d.poll(t0 + WINDOW), Some(7));
        assert_eq!(d.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn cancel_discards_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.request("x", t0);
        d.cancel();
        assert_eq!(d.poll(t0 + WINDOW * 10), None);
        assert!(d.deadline().is_none());
    }

    #[test]
    fn separate_windows_fire_separately() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.request(1, t0);
        assert_eq!(d.poll(t0 + WINDOW), Some(1));
        d.request(2, t0 + WINDOW * 2);
        assert_eq!(d.poll(t0 + WINDOW * 3), Some(2));
    }
}
