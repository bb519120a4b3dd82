//! Hand-driven clock for deterministic tests.

use mcdaq_core::Clock;
use parking_lot::Mutex;

/// Clock whose time only moves when the test says so.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Set the absolute time.
    pub fn set(&self, now: f64) {
        *self.now.lock() = now;
    }

    /// Move time forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}
