//! Sliding-window rapid-tap detection
//!
//! Promotes a burst of tap events into a single discrete signal. Timestamps
//! older than the window are pruned before counting, so isolated taps never
//! accumulate across gaps; reaching the threshold fires once and clears the
//! buffer.

use std::time::{Duration, Instant};

pub struct TapDetector {
    window: Duration,
    threshold: usize,
    taps: Vec<Instant>,
}

impl TapDetector {
    pub fn new(window: Duration, threshold: usize) -> Self {
        assert!(threshold > 0, "threshold must be at least 1");
        Self {
            window,
            threshold,
            taps: Vec::with_capacity(threshold),
        }
    }

    /// Record a tap happening now. Returns true when this tap completes a
    /// burst; the recorded taps are cleared so the next burst starts fresh.
    pub fn record(&mut self) -> bool {
        self.record_at(Instant::now())
    }

    /// Record a tap at an explicit instant (the event's timestamp).
    pub fn record_at(&mut self, now: Instant) -> bool {
        self.taps
            .retain(|&t| now.saturating_duration_since(t) < self.window);
        self.taps.push(now);

        if self.taps.len() >= self.threshold {
            self.taps.clear();
            true
        } else {
            false
        }
    }

    /// Taps currently inside the window, as of the last recorded event.
    pub fn count(&self) -> usize {
        self.taps.len()
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> TapDetector {
        TapDetector::new(Duration::from_millis(1500), 5)
    }

    #[test]
    fn burst_within_window_fires_once_and_resets() {
        let mut d = detector();
        let start = Instant::now();
        for i in 0..4 {
            assert!(!d.record_at(start + Duration::from_millis(i * 200)));
        }
        assert!(d.record_at(start + Duration::from_millis(1000)));
        assert_eq!(d.count(), 0, "count resets after firing");
    }

    #[test]
    fn stale_taps_are_pruned() {
        let mut d = detector();
        let start = Instant::now();
        for i in 0..4 {
            d.record_at(start + Duration::from_millis(i * 100));
        }
        // A tap 2 s after the burst stands alone; nothing fires.
        assert!(!d.record_at(start + Duration::from_millis(2300)));
        assert_eq!(d.count(), 1);
    }

    #[test]
    fn no_immediate_refire_after_burst() {
        let mut d = detector();
        let start = Instant::now();
        for i in 0..5 {
            d.record_at(start + Duration::from_millis(i * 100));
        }
        // Next tap after the signal starts a fresh burst.
        assert!(!d.record_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn slow_taps_never_accumulate() {
        let mut d = detector();
        let start = Instant::now();
        for i in 0..20 {
            assert!(
                !d.record_at(start + Duration::from_millis(i * 1600)),
                "taps {} ms apart must not fire",
                1600
            );
            assert_eq!(d.count(), 1);
        }
    }

    #[test]
    fn higher_threshold_instance() {
        let mut d = TapDetector::new(Duration::from_millis(1500), 8);
        let start = Instant::now();
        for i in 0..7 {
            assert!(!d.record_at(start + Duration::from_millis(i * 150)));
        }
        assert!(d.record_at(start + Duration::from_millis(1100)));
    }

    #[test]
    fn reset_clears_pending_taps() {
        let mut d = detector();
        let start = Instant::now();
        d.record_at(start);
        d.record_at(start + Duration::from_millis(10));
        d.reset();
        assert_eq!(d.count(), 0);
    }
}
