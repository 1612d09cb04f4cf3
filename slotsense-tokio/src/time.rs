//! Std clock implementation

use std::time::Instant;

use slotsense_core::Clock;

/// Monotonic clock anchored at construction
///
/// Reports milliseconds since the clock was created, mirroring the
/// milliseconds-since-boot semantics the core expects.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
