//! Dual cadence scheduler - runtime loop implementation

use std::time::Duration;

use sowai_core::{ClockError, ClockResult, InferenceRequest, LatentBatch, TimeDigits};
use sowai_time::{CadenceState, ClockSampler, MonotonicClock, SystemClock};
use sowai_visual::{BatchAssembler, CompositeFrame};
use tracing::{debug, error, info, trace};

use crate::{ClockConfig, DisplaySurface, InferenceEngine, NoiseSource, ShutdownSignal};

/// Loop counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed generation cycles
    pub generations: u64,
    /// Render ticks (including skipped presents)
    pub renders: u64,
    /// Frames actually handed to the display
    pub presents: u64,
    /// Render ticks with an empty output area
    pub skipped_presents: u64,
    /// Idle sleeps taken
    pub idle_sleeps: u64,
    /// Duration of the most recent generation cycle
    pub last_generation: Duration,
    /// Digits of the most recent generation
    pub last_digits: Option<TimeDigits>,
}

/// Which triggers fired during one iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub generated: bool,
    pub rendered: bool,
}

impl TickOutcome {
    #[inline]
    pub fn fired(&self) -> bool {
        self.generated || self.rendered
    }
}

/// Drives generation and rendering on independent cadences
///
/// Owns the single composite frame: generation is its only writer,
/// rendering its only reader, both on the calling thread.
pub struct DualCadenceScheduler<E, D, C = SystemClock> {
    sampler: ClockSampler,
    noise: NoiseSource,
    assembler: BatchAssembler,
    engine: E,
    display: D,
    clock: C,
    cadence: CadenceState,
    latents: LatentBatch,
    request: InferenceRequest,
    frame: CompositeFrame,
    max_scale: u32,
    stats: SchedulerStats,
}

impl<E, D, C> DualCadenceScheduler<E, D, C>
where
    E: InferenceEngine,
    D: DisplaySurface,
    C: MonotonicClock,
{
    /// Build a scheduler; both cadences start at the clock's current time
    ///
    /// The engine's declared geometry must match the configuration.
    pub fn new(config: &ClockConfig, engine: E, display: D, clock: C) -> ClockResult<Self> {
        config.validate()?;
        let shape = config.shape;

        let declared = engine.shape();
        ClockError::check_len("engine batch", shape.batch_size, declared.batch_size)?;
        ClockError::check_len("engine latent dim", shape.latent_dim, declared.latent_dim)?;
        ClockError::check_len("engine image width", shape.image_width, declared.image_width)?;
        ClockError::check_len("engine image height", shape.image_height, declared.image_height)?;

        let cadence = CadenceState::new(config.cadence(), clock.now());

        Ok(DualCadenceScheduler {
            sampler: ClockSampler::local(),
            noise: NoiseSource::from_time(),
            assembler: BatchAssembler::new(shape),
            engine,
            display,
            clock,
            cadence,
            latents: LatentBatch::zeroed(shape.batch_size, shape.latent_dim),
            request: InferenceRequest::for_shape(&shape),
            frame: CompositeFrame::for_shape(&shape),
            max_scale: config.max_scale,
            stats: SchedulerStats::default(),
        })
    }

    /// Replace the wall-clock sampler
    pub fn with_sampler(mut self, sampler: ClockSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Replace the noise source
    pub fn with_noise(mut self, noise: NoiseSource) -> Self {
        self.noise = noise;
        self
    }

    /// Run until `shutdown` is requested or the pipeline fails
    pub fn run<S: ShutdownSignal + ?Sized>(&mut self, shutdown: &S) -> ClockResult<SchedulerStats> {
        info!(
            generation_ms = self.cadence.generation.interval().as_millis() as u64,
            render_ms = self.cadence.render.interval().as_millis() as u64,
            idle_ms = self.cadence.idle_sleep.as_millis() as u64,
            noise_seed = self.noise.seed(),
            "scheduler started"
        );

        while !shutdown.is_requested() {
            let outcome = match self.tick() {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "clock pipeline failed, stopping");
                    return Err(e);
                }
            };

            if !outcome.fired() {
                let quantum = self.cadence.idle_quantum(self.clock.now());
                trace!(sleep_us = quantum.as_micros() as u64, "idle");
                self.clock.sleep(quantum);
                self.stats.idle_sleeps += 1;
            }
        }

        info!(
            generations = self.stats.generations,
            renders = self.stats.renders,
            "scheduler stopped"
        );
        Ok(self.stats.clone())
    }

    /// One loop iteration: generation check, then render check
    pub fn tick(&mut self) -> ClockResult<TickOutcome> {
        let mut outcome = TickOutcome::default();

        let now = self.clock.now();
        if self.cadence.generation.is_due(now) {
            self.generate()?;
            self.cadence.generation.mark(now);
            outcome.generated = true;
        }

        let now = self.clock.now();
        if self.cadence.render.is_due(now) {
            self.render()?;
            self.cadence.render.mark(now);
            outcome.rendered = true;
        }

        Ok(outcome)
    }

    fn generate(&mut self) -> ClockResult<()> {
        let started = self.clock.now();

        let digits = self.sampler.sample();
        self.noise.fill(&mut self.latents);
        self.assembler
            .encode(&digits, &self.latents, &mut self.request)?;
        let images = self.engine.run(&self.request)?;
        self.assembler.decode(images, &mut self.frame)?;

        let elapsed = self.clock.now() - started;
        self.stats.generations += 1;
        self.stats.last_generation = elapsed;
        self.stats.last_digits = Some(digits);

        debug!(
            digits = %digits,
            elapsed_us = elapsed.as_micros() as u64,
            sequence = self.frame.sequence(),
            "generated frame"
        );
        Ok(())
    }

    fn render(&mut self) -> ClockResult<()> {
        let (width, height) = self.display.output_size()?;
        self.stats.renders += 1;

        match self.frame.target_rect(width, height, self.max_scale) {
            Some(target) => {
                self.display.present(&self.frame, target)?;
                self.stats.presents += 1;
                trace!(sequence = self.frame.sequence(), ?target, "presented frame");
            }
            None => {
                self.stats.skipped_presents += 1;
                trace!("output area empty, present skipped");
            }
        }
        Ok(())
    }

    /// Current composite frame
    #[inline]
    pub fn frame(&self) -> &CompositeFrame {
        &self.frame
    }

    #[inline]
    pub fn cadence(&self) -> &CadenceState {
        &self.cadence
    }

    #[inline]
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
