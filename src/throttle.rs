//! Trailing-edge throttle for continuous pointer input
//!
//! Time is passed in explicitly so the host loop and tests share one clock.
//! The first value in a window runs immediately; later values in the same
//! window replace each other as the pending value, which is released by
//! [`Throttle::poll`] once the window closes or by [`Throttle::flush`].

use std::time::{Duration, Instant};

/// Suggested interval between pointer-move updates
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a value at `now`. Returns it if it may run immediately,
    /// otherwise keeps it as the pending trailing value.
    pub fn submit(&mut self, now: Instant, value: T) -> Option<T> {
        if self.window_open(now) {
            self.last_fired = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the pending value if its window has closed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.window_open(now) {
            self.last_fired = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the pending value regardless of timing
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending value and reopen the window
    pub fn reset(&mut self) {
        self.last_fired = None;
        self.pending = None;
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }
}

impl<T> Default for Throttle<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_leading_edge_fires() {
        let mut throttle = Throttle::new(ms(50));
        let t0 = Instant::now();

        assert_eq!(throttle.submit(t0, 1), Some(1));
        assert_eq!(throttle.submit(t0 + ms(10), 2), None);
        assert!(throttle.has_pending());
    }

    #[test]
    fn test_burst_keeps_latest_pending() {
        let mut throttle = Throttle::new(ms(50));
        let t0 = Instant::now();

        let fired: Vec<_> = (0..20)
            .filter_map(|i| throttle.submit(t0 + ms(i), i))
            .collect();

        assert_eq!(fired, vec![0]);
        assert_eq!(throttle.flush(), Some(19));
        assert_eq!(throttle.flush(), None);
    }

    #[test]
    fn test_trailing_edge_on_poll() {
        let mut throttle = Throttle::new(ms(50));
        let t0 = Instant::now();

        throttle.submit(t0, 'a');
        throttle.submit(t0 + ms(20), 'b');

        assert_eq!(throttle.poll(t0 + ms(49)), None);
        assert_eq!(throttle.poll(t0 + ms(50)), Some('b'));
        assert_eq!(throttle.poll(t0 + ms(200)), None);

        // Window restarted at the trailing fire
        assert_eq!(throttle.submit(t0 + ms(60), 'c'), None);
        assert_eq!(throttle.submit(t0 + ms(100), 'd'), Some('d'));
    }

    #[test]
    fn test_boundary_submission_runs() {
        let mut throttle = Throttle::new(ms(50));
        let t0 = Instant::now();

        throttle.submit(t0, 1);
        assert_eq!(throttle.submit(t0 + ms(50), 2), Some(2));
        assert!(!throttle.has_pending());
    }

    #[test]
    fn test_reset_reopens_window() {
        let mut throttle = Throttle::new(ms(50));
        let t0 = Instant::now();

        throttle.submit(t0, 1);
        throttle.submit(t0 + ms(1), 2);
        throttle.reset();

        assert!(!throttle.has_pending());
        assert_eq!(throttle.submit(t0 + ms(2), 3), Some(3));
    }

    #[test]
    fn test_zero_interval_never_suppresses() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let t0 = Instant::now();

        assert!((0..5).all(|i| throttle.submit(t0, i) == Some(i)));
    }
}
