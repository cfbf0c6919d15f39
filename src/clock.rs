//! Time source for the frame loop.

use std::time::{Duration, Instant};

pub trait Clock {
    /// Milliseconds since the clock was created.
    fn now_ms(&self) -> u64;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
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
        self.start.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
