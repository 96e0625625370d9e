//! Dual cadence state - when generation and rendering are allowed to fire

use std::time::Duration;

use sowai_core::LoopTime;

/// Cadence configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CadenceConfig {
    /// Period of the generation trigger
    pub generation_interval: Duration,
    /// Period of the render trigger
    pub render_interval: Duration,
    /// Sleep quantum when neither trigger fires
    pub idle_sleep: Duration,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        CadenceConfig {
            generation_interval: Duration::from_millis(333),
            render_interval: Duration::from_millis(120),
            idle_sleep: Duration::from_millis(120),
        }
    }
}

/// A single periodic trigger
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    interval: Duration,
    last_fired: LoopTime,
    fire_count: u64,
}

impl Cadence {
    /// Trigger whose first period starts at `start`
    pub fn new(interval: Duration, start: LoopTime) -> Self {
        Cadence {
            interval,
            last_fired: start,
            fire_count: 0,
        }
    }

    /// True once a full interval has elapsed since the last firing
    #[inline]
    pub fn is_due(&self, now: LoopTime) -> bool {
        now.since(self.last_fired) >= self.interval
    }

    /// Record a firing at `now`
    ///
    /// The next period is measured from `now`, not from the previous
    /// deadline, so a late firing shifts the phase instead of bursting.
    #[inline]
    pub fn mark(&mut self, now: LoopTime) {
        self.last_fired = now;
        self.fire_count += 1;
    }

    /// Fire if due; returns whether it fired
    pub fn poll(&mut self, now: LoopTime) -> bool {
        if self.is_due(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }

    /// Time left until the trigger is due
    pub fn remaining(&self, now: LoopTime) -> Duration {
        self.interval.saturating_sub(now.since(self.last_fired))
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn last_fired(&self) -> LoopTime {
        self.last_fired
    }

    #[inline]
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }
}

/// Last-fired timestamps and intervals for both triggers
#[derive(Clone, Copy, Debug)]
pub struct CadenceState {
    /// Generation trigger
    pub generation: Cadence,
    /// Render trigger
    pub render: Cadence,
    /// Idle sleep quantum
    pub idle_sleep: Duration,
}

impl CadenceState {
    /// Both triggers start their first period at `start`
    pub fn new(config: CadenceConfig, start: LoopTime) -> Self {
        CadenceState {
            generation: Cadence::new(config.generation_interval, start),
            render: Cadence::new(config.render_interval, start),
            idle_sleep: config.idle_sleep,
        }
    }

    /// Sleep to take when idle, shortened if a trigger comes due sooner
    pub fn idle_quantum(&self, now: LoopTime) -> Duration {
        self.idle_sleep
            .min(self.generation.remaining(now))
            .min(self.render.remaining(now))
            .max(Duration::from_micros(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_not_due_at_start() {
        let mut cadence = Cadence::new(Duration::from_millis(120), LoopTime::ZERO);

        assert!(!cadence.poll(LoopTime::ZERO));
        assert!(!cadence.poll(LoopTime::from_millis(119)));
        assert!(cadence.poll(LoopTime::from_millis(120)));
        assert_eq!(cadence.last_fired(), LoopTime::from_millis(120));
        assert_eq!(cadence.fire_count(), 1);
    }

    #[test]
    fn test_late_firing_shifts_phase() {
        let mut cadence = Cadence::new(Duration::from_millis(100), LoopTime::ZERO);

        assert!(cadence.poll(LoopTime::from_millis(150)));
        // Next period counts from 150, not 100
        assert!(!cadence.poll(LoopTime::from_millis(200)));
        assert!(cadence.poll(LoopTime::from_millis(250)));
    }

    #[test]
    fn test_independent_triggers() {
        let mut state = CadenceState::new(CadenceConfig::default(), LoopTime::ZERO);

        let mut generations = 0;
        let mut renders = 0;
        for ms in 0..=1000 {
            let now = LoopTime::from_millis(ms);
            if state.generation.poll(now) {
                generations += 1;
            }
            if state.render.poll(now) {
                renders += 1;
            }
        }

        assert_eq!(generations, 3);
        assert_eq!(renders, 8);
    }

    #[test]
    fn test_idle_quantum_bounded() {
        let state = CadenceState::new(CadenceConfig::default(), LoopTime::ZERO);

        assert_eq!(state.idle_quantum(LoopTime::ZERO), Duration::from_millis(120));
        assert_eq!(
            state.idle_quantum(LoopTime::from_millis(100)),
            Duration::from_millis(20)
        );
    }
}
