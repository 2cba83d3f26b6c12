//! Polled repeating timer
//!
//! The TUI loop already wakes up every few milliseconds to poll for input,
//! so the timer never sleeps or spawns anything: the loop hands it the
//! current [`Instant`] and it reports whether a tick is due.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    armed: bool,
    last_tick: Instant,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        RepeatingTimer {
            interval,
            armed: false,
            last_tick: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the cadence without disarming; the next tick is measured from
    /// the previous one
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start ticking; the first tick fires one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.armed = true;
        self.last_tick = now;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// True when armed and at least one interval has passed since the last
    /// tick. Missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.armed || now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_never_fires() {
        let start = Instant::now();
        let mut timer = RepeatingTimer::new(Duration::from_millis(10));
        assert!(!timer.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = RepeatingTimer::new(Duration::from_millis(100));
        timer.arm(start);

        assert!(!timer.poll(start + Duration::from_millis(50)));
        assert!(timer.poll(start + Duration::from_millis(100)));
        assert!(!timer.poll(start + Duration::from_millis(150)));
        // A long stall yields a single tick
        assert!(timer.poll(start + Duration::from_millis(900)));
        assert!(!timer.poll(start + Duration::from_millis(950)));
    }

    #[test]
    fn test_set_interval_keeps_armed() {
        let start = Instant::now();
        let mut timer = RepeatingTimer::new(Duration::from_millis(500));
        timer.arm(start);
        timer.set_interval(Duration::from_millis(5));

        assert!(timer.is_armed());
        assert!(timer.poll(start + Duration::from_millis(5)));
    }
}
