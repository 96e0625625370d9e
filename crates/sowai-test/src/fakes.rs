//! Fake collaborators for the scheduler

use std::time::Duration;

use sowai_core::{BatchShape, ClockError, ClockResult, ImageBatch, InferenceRequest, LoopTime};
use sowai_runtime::{DisplaySurface, InferenceEngine};
use sowai_time::{MonotonicClock, SimulatedClock};
use sowai_visual::{CompositeFrame, TargetRect};

/// Engine returning the same intensity everywhere
pub struct ConstantEngine {
    shape: BatchShape,
    value: f32,
    calls: u64,
}

impl ConstantEngine {
    pub fn new(shape: BatchShape, value: f32) -> Self {
        ConstantEngine {
            shape,
            value,
            calls: 0,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl InferenceEngine for ConstantEngine {
    fn shape(&self) -> &BatchShape {
        &self.shape
    }

    fn run(&mut self, _request: &InferenceRequest) -> ClockResult<ImageBatch> {
        self.calls += 1;
        Ok(ImageBatch::filled(&self.shape, self.value))
    }
}

/// Engine shading each image by its label (`label / 9`)
///
/// Lets tests read the requested digits back out of the frame.
pub struct LabelEchoEngine {
    shape: BatchShape,
    flat_output: bool,
    fail_on_call: Option<u64>,
    calls: u64,
    requests: Vec<Vec<i64>>,
}

impl LabelEchoEngine {
    pub fn new(shape: BatchShape) -> Self {
        LabelEchoEngine {
            shape,
            flat_output: false,
            fail_on_call: None,
            calls: 0,
            requests: Vec::new(),
        }
    }

    /// Emit `[batch, h*w]` instead of `[batch, h, w]`
    pub fn flat(mut self) -> Self {
        self.flat_output = true;
        self
    }

    /// Fail the `n`th call (1-based)
    pub fn failing_on(mut self, n: u64) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Labels of every request seen
    pub fn requests(&self) -> &[Vec<i64>] {
        &self.requests
    }
}

/// Byte a label shade decodes to
pub fn label_shade(label: u8) -> u8 {
    ((label as f32 / 9.0) * 255.0) as u8
}

impl InferenceEngine for LabelEchoEngine {
    fn shape(&self) -> &BatchShape {
        &self.shape
    }

    fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(ClockError::InferenceFailed(format!(
                "scripted failure on call {}",
                self.calls
            )));
        }
        self.requests.push(request.labels().to_vec());

        let per_image = self.shape.pixels_per_image();
        let data = request
            .labels()
            .iter()
            .flat_map(|label| std::iter::repeat(*label as f32 / 9.0).take(per_image))
            .collect();

        let dims = if self.flat_output {
            vec![self.shape.batch_size, per_image]
        } else {
            self.shape.image_dims().to_vec()
        };
        ImageBatch::new(dims, data)
    }
}

/// Wraps an engine and charges simulated time for each call
pub struct SlowEngine<E> {
    inner: E,
    clock: SimulatedClock,
    cost: Duration,
}

impl<E> SlowEngine<E> {
    pub fn new(inner: E, clock: SimulatedClock, cost: Duration) -> Self {
        SlowEngine { inner, clock, cost }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: InferenceEngine> InferenceEngine for SlowEngine<E> {
    fn shape(&self) -> &BatchShape {
        self.inner.shape()
    }

    fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch> {
        self.clock.advance(self.cost);
        self.inner.run(request)
    }
}

/// One `present` call as seen by the display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentedFrame {
    /// Loop time of the call
    pub at: LoopTime,
    /// Frame rebuild count
    pub sequence: u64,
    pub target: TargetRect,
    /// First pixel of each digit slot
    pub slot_shades: Vec<u8>,
}

/// Display recording every present, with scripted output-area sizes
pub struct RecordingDisplay {
    clock: SimulatedClock,
    size: (u32, u32),
    resizes: Vec<(LoopTime, (u32, u32))>,
    slot_width: usize,
    presented: Vec<PresentedFrame>,
    fail_present: bool,
}

impl RecordingDisplay {
    pub fn new(clock: SimulatedClock, size: (u32, u32), slot_width: usize) -> Self {
        RecordingDisplay {
            clock,
            size,
            resizes: Vec::new(),
            slot_width,
            presented: Vec::new(),
            fail_present: false,
        }
    }

    /// Change the output area once loop time reaches `at`
    pub fn resize_at(mut self, at: LoopTime, size: (u32, u32)) -> Self {
        self.resizes.push((at, size));
        self.resizes.sort_by_key(|(t, _)| *t);
        self
    }

    /// Make every present fail
    pub fn failing(mut self) -> Self {
        self.fail_present = true;
        self
    }

    pub fn presented(&self) -> &[PresentedFrame] {
        &self.presented
    }
}

impl DisplaySurface for RecordingDisplay {
    fn output_size(&mut self) -> ClockResult<(u32, u32)> {
        let now = self.clock.now();
        if let Some((_, size)) = self.resizes.iter().rev().find(|(t, _)| *t <= now) {
            self.size = *size;
        }
        Ok(self.size)
    }

    fn present(&mut self, frame: &CompositeFrame, target: TargetRect) -> ClockResult<()> {
        if self.fail_present {
            return Err(ClockError::DisplayFailed("surface lost".into()));
        }

        let slots = if self.slot_width == 0 {
            0
        } else {
            frame.width() / self.slot_width
        };
        let slot_shades = (0..slots)
            .map(|slot| frame.pixel(slot * self.slot_width, 0)[0])
            .collect();

        self.presented.push(PresentedFrame {
            at: self.clock.now(),
            sequence: frame.sequence(),
            target,
            slot_shades,
        });
        Ok(())
    }
}
