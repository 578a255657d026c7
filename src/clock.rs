//! Time sources. `SystemClock` for the real thing, `ManualClock` for tests
//! and headless runs where time only moves when told to.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Single source of "now" for a session
pub trait Clock {
    /// Monotonic milliseconds since the clock was created
    fn now_ms(&self) -> u64;

    /// Local wall-clock time, used for classification and pulsing
    fn wall_clock(&self) -> DateTime<Local>;

    fn wall_clock_secs(&self) -> f64 {
        let wall = self.wall_clock();
        wall.timestamp() as f64 + f64::from(wall.timestamp_subsec_millis()) / 1000.0
    }
}

/// Production clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wall_clock(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven clock for tests and headless runs. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    elapsed_ms: Rc<Cell<u64>>,
    start: DateTime<Local>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            elapsed_ms: Rc::new(Cell::new(0)),
            start,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed_ms
            .set(self.elapsed_ms.get() + by.as_millis() as u64);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }

    fn wall_clock(&self) -> DateTime<Local> {
        self.start + ChronoDuration::milliseconds(self.elapsed_ms.get() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Local.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let view = clock.clone();

        clock.advance_ms(1_500);

        assert_eq!(view.now_ms(), 1_500);
        assert_eq!(view.wall_clock(), start + ChronoDuration::milliseconds(1_500));
    }

    #[test]
    fn wall_clock_secs_keeps_millis() {
        let start = Local.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance_ms(250);
        let expected = start.timestamp() as f64 + 0.25;
        assert!((clock.wall_clock_secs() - expected).abs() < 1e-9);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
