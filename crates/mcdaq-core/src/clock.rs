//! Process time source capability.

use std::time::Instant;

/// Monotonic wall-clock source measured in floating-point seconds.
///
/// All event timing fields (logged time, epoch pre/post, hub time) are
/// expressed on this timebase. Injected so tests can drive time by
/// hand.
pub trait Clock: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> f64;
}

/// Clock backed by [`Instant`], reporting seconds since construction.
#[derive(Debug)]
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
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
