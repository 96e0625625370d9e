//! Loop time primitive
//!
//! The scheduler measures cadences on a monotonic timeline that starts at
//! zero when the clock is created. Wall-clock readings never enter it.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Monotonic loop time, microseconds since clock start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoopTime(pub u64);

impl LoopTime {
    pub const ZERO: LoopTime = LoopTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        LoopTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        LoopTime(millis * 1000)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        LoopTime(self.0.saturating_add(duration.as_micros() as u64))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn since(self, earlier: LoopTime) -> Duration {
        self - earlier
    }
}

impl Add<Duration> for LoopTime {
    type Output = LoopTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<LoopTime> for LoopTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: LoopTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for LoopTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}ms)", self.0 as f64 / 1000.0)
    }
}
