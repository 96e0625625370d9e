//! Clock implementations for the SOWAI scheduler
//!
//! Two kinds of clock are involved:
//! - wall clocks, read once per generation to pick the digits to draw
//! - monotonic loop clocks, which gate the cadences and perform the idle sleep

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Timelike;
use sowai_core::LoopTime;

/// Source of the local time of day
pub trait LocalTimeSource {
    /// Current `(hour, minute, second)` on a 24-hour clock
    fn hms(&self) -> (u32, u32, u32);
}

/// The host's local time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl LocalTimeSource for LocalClock {
    fn hms(&self) -> (u32, u32, u32) {
        let now = chrono::Local::now();
        (now.hour(), now.minute(), now.second())
    }
}

/// A frozen time of day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedLocalTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl FixedLocalTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        FixedLocalTime {
            hour,
            minute,
            second,
        }
    }
}

impl LocalTimeSource for FixedLocalTime {
    fn hms(&self) -> (u32, u32, u32) {
        (self.hour, self.minute, self.second)
    }
}

/// Monotonic timeline driving the scheduler
///
/// `sleep` is part of the clock so that simulated time can stand in for the
/// idle wait.
pub trait MonotonicClock {
    /// Time since the clock was created
    fn now(&self) -> LoopTime;

    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// OS-backed monotonic clock
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    reference: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            reference: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> LoopTime {
        LoopTime::from_micros(self.reference.elapsed().as_micros() as u64)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock for deterministic tests
///
/// Time only moves through `advance` or `sleep`. Clones share one timeline,
/// so a test can keep a handle while the scheduler owns another.
#[derive(Clone, Debug, Default)]
pub struct SimulatedClock {
    micros: Arc<AtomicU64>,
}

impl SimulatedClock {
    /// Clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, duration: Duration) {
        self.micros
            .fetch_add(duration.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time; never moves backwards
    pub fn set(&self, t: LoopTime) {
        self.micros.fetch_max(t.as_micros(), Ordering::SeqCst);
    }
}

impl MonotonicClock for SimulatedClock {
    fn now(&self) -> LoopTime {
        LoopTime::from_micros(self.micros.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
