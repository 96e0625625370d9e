//! Cadence Simulator - runs the real scheduler on simulated time
//!
//! Simulates:
//! - Zero-cost or slow inference
//! - A frozen time of day
//! - Output-area resizes
//! - Shutdown at a fixed loop time

use std::time::Duration;

use sowai_core::{ClockResult, LoopTime};
use sowai_runtime::{
    shutdown_when, ClockConfig, DualCadenceScheduler, NoiseSource, SchedulerStats,
};
use sowai_time::{ClockSampler, FixedLocalTime, MonotonicClock, SimulatedClock};

use crate::fakes::{LabelEchoEngine, PresentedFrame, RecordingDisplay, SlowEngine};

/// Simulation parameters
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Scheduler configuration
    pub clock: ClockConfig,
    /// Simulated time charged per inference call
    pub inference_cost: Duration,
    /// Stop once loop time passes this
    pub duration: Duration,
    /// Time of day seen by the sampler
    pub local_time: FixedLocalTime,
    /// Initial output area
    pub output_size: (u32, u32),
    /// Scripted output-area changes
    pub resizes: Vec<(LoopTime, (u32, u32))>,
    /// Noise seed
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            clock: ClockConfig::default(),
            inference_cost: Duration::ZERO,
            duration: Duration::from_secs(1),
            local_time: FixedLocalTime::new(5, 3, 27),
            output_size: (1280, 800),
            resizes: Vec::new(),
            seed: 42,
        }
    }
}

/// What the simulated run produced
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub stats: SchedulerStats,
    pub presented: Vec<PresentedFrame>,
    /// Labels sent to the engine, per generation
    pub requests: Vec<Vec<i64>>,
    /// Loop time when the run stopped
    pub ended_at: LoopTime,
}

impl SimulationResult {
    /// Presents that showed frame `sequence`
    pub fn presents_of(&self, sequence: u64) -> usize {
        self.presented
            .iter()
            .filter(|p| p.sequence == sequence)
            .count()
    }
}

/// Drives a scheduler wired to fakes
pub struct CadenceSimulation {
    config: SimulationConfig,
}

impl CadenceSimulation {
    pub fn new(config: SimulationConfig) -> Self {
        CadenceSimulation { config }
    }

    /// Run until loop time exceeds the configured duration
    pub fn run(&self) -> ClockResult<SimulationResult> {
        let cfg = &self.config;
        let clock = SimulatedClock::new();
        let shape = cfg.clock.shape;

        let engine = SlowEngine::new(LabelEchoEngine::new(shape), clock.clone(), cfg.inference_cost);
        let mut display =
            RecordingDisplay::new(clock.clone(), cfg.output_size, shape.image_width);
        for (at, size) in &cfg.resizes {
            display = display.resize_at(*at, *size);
        }

        let mut scheduler = DualCadenceScheduler::new(&cfg.clock, engine, display, clock.clone())?
            .with_sampler(ClockSampler::with_source(cfg.local_time))
            .with_noise(NoiseSource::with_seed(cfg.seed));

        let deadline = LoopTime::ZERO + cfg.duration;
        let handle = clock.clone();
        let stats = scheduler.run(&shutdown_when(move || handle.now() > deadline))?;

        Ok(SimulationResult {
            stats,
            presented: scheduler.display().presented().to_vec(),
            requests: scheduler.engine().inner().requests().to_vec(),
            ended_at: clock.now(),
        })
    }
}

/// Preset simulations
pub mod scenarios {
    use super::*;

    /// Default cadences, free inference, one second
    pub fn nominal_second() -> CadenceSimulation {
        CadenceSimulation::new(SimulationConfig::default())
    }

    /// Inference slower than the render interval
    pub fn slow_inference(cost: Duration) -> CadenceSimulation {
        CadenceSimulation::new(SimulationConfig {
            inference_cost: cost,
            duration: Duration::from_secs(2),
            ..SimulationConfig::default()
        })
    }

    /// Window resized, then minimized
    pub fn resize_then_minimize() -> CadenceSimulation {
        CadenceSimulation::new(SimulationConfig {
            resizes: vec![
                (LoopTime::from_millis(400), (400, 100)),
                (LoopTime::from_millis(700), (0, 0)),
            ],
            ..SimulationConfig::default()
        })
    }
}
