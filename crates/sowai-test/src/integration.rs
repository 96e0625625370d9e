//! End-to-end Integration Test Suite
//!
//! Verifies the complete clock flow:
//! - Wall-clock digits reach the generator as labels
//! - Generated images land in the right frame slots
//! - Frames are re-presented unchanged between generations
//! - Pipeline failures stop the loop without a partial frame

use std::time::Duration;

use proptest::prelude::*;
use sowai_core::{BatchShape, ClockError, ImageBatch, LoopTime, TimeDigits};
use sowai_runtime::{shutdown_when, ClockConfig, DualCadenceScheduler, NoiseSource};
use sowai_time::{ClockSampler, FixedLocalTime, MonotonicClock, SimulatedClock};
use sowai_visual::{BatchAssembler, CompositeFrame};

use crate::fakes::{label_shade, ConstantEngine, LabelEchoEngine, RecordingDisplay};
use crate::simulator::{scenarios, CadenceSimulation, SimulationConfig};

fn shades_for(digits: &[u8]) -> Vec<u8> {
    digits.iter().map(|d| label_shade(*d)).collect()
}

#[test]
fn test_digits_drive_labels_and_slots() {
    let result = scenarios::nominal_second().run().unwrap();

    for labels in &result.requests {
        assert_eq!(labels, &vec![0, 5, 0, 3, 2, 7]);
    }

    let expected = shades_for(&[0, 5, 0, 3, 2, 7]);
    for present in result.presented.iter().filter(|p| p.sequence > 0) {
        assert_eq!(present.slot_shades, expected);
    }
}

#[test]
fn test_black_frame_until_first_generation() {
    let result = scenarios::nominal_second().run().unwrap();

    // Renders at 120 and 240 precede the first generation at 333
    assert_eq!(result.presents_of(0), 2);
    for present in result.presented.iter().take(2) {
        assert!(present.slot_shades.iter().all(|s| *s == 0));
    }
}

#[test]
fn test_frame_reused_across_render_ticks() {
    let result = CadenceSimulation::new(SimulationConfig {
        duration: Duration::from_secs(3),
        ..SimulationConfig::default()
    })
    .run()
    .unwrap();

    let total: usize = (0..=result.stats.generations)
        .map(|seq| result.presents_of(seq))
        .sum();
    assert_eq!(total, result.presented.len());
    // More render ticks than generations: some frames shown repeatedly
    assert!(result.presented.len() as u64 > result.stats.generations);
    assert!((1..=result.stats.generations).any(|seq| result.presents_of(seq) > 1));
}

#[test]
fn test_midnight_reads_as_zeros() {
    let result = CadenceSimulation::new(SimulationConfig {
        local_time: FixedLocalTime::new(0, 0, 0),
        ..SimulationConfig::default()
    })
    .run()
    .unwrap();

    assert!(result.requests.iter().all(|labels| labels.iter().all(|l| *l == 0)));
    assert_eq!(result.stats.last_digits, Some(TimeDigits::from_hms(12, 0, 0)));
}

#[test]
fn test_flat_engine_output_accepted() {
    let clock = SimulatedClock::new();
    let shape = BatchShape::default();
    let display = RecordingDisplay::new(clock.clone(), (800, 600), shape.image_width);
    let engine = LabelEchoEngine::new(shape).flat();

    let mut scheduler =
        DualCadenceScheduler::new(&ClockConfig::default(), engine, display, clock.clone())
            .unwrap()
            .with_sampler(ClockSampler::with_source(FixedLocalTime::new(9, 41, 0)));

    clock.advance(Duration::from_millis(333));
    scheduler.tick().unwrap();

    assert_eq!(
        scheduler.display().presented()[0].slot_shades,
        shades_for(&[0, 9, 4, 1, 0, 0])
    );
}

#[test]
fn test_inference_failure_stops_loop() {
    let clock = SimulatedClock::new();
    let shape = BatchShape::default();
    let display = RecordingDisplay::new(clock.clone(), (800, 600), shape.image_width);
    let engine = LabelEchoEngine::new(shape).failing_on(3);

    let mut scheduler =
        DualCadenceScheduler::new(&ClockConfig::default(), engine, display, clock.clone())
            .unwrap()
            .with_sampler(ClockSampler::with_source(FixedLocalTime::new(5, 3, 27)));

    let err = scheduler.run(&shutdown_when(|| false)).unwrap_err();
    assert!(matches!(err, ClockError::InferenceFailed(_)));

    // Failed at the third generation (t = 999ms); nothing presented after it
    assert_eq!(scheduler.stats().generations, 2);
    assert_eq!(clock.now(), LoopTime::from_millis(999));
    let expected = shades_for(&[0, 5, 0, 3, 2, 7]);
    for present in scheduler.display().presented() {
        assert!(present.sequence <= 2);
        if present.sequence > 0 {
            assert_eq!(present.slot_shades, expected);
        }
    }
}

#[test]
fn test_display_failure_is_fatal() {
    let clock = SimulatedClock::new();
    let shape = BatchShape::default();
    let display = RecordingDisplay::new(clock.clone(), (800, 600), shape.image_width).failing();

    let mut scheduler = DualCadenceScheduler::new(
        &ClockConfig::default(),
        ConstantEngine::new(shape, 0.5),
        display,
        clock,
    )
    .unwrap();

    let err = scheduler.run(&shutdown_when(|| false)).unwrap_err();
    assert!(matches!(err, ClockError::DisplayFailed(_)));
}

#[test]
fn test_shutdown_before_first_iteration() {
    let clock = SimulatedClock::new();
    let shape = BatchShape::default();
    let display = RecordingDisplay::new(clock.clone(), (800, 600), shape.image_width);
    let mut scheduler = DualCadenceScheduler::new(
        &ClockConfig::default(),
        ConstantEngine::new(shape, 1.0),
        display,
        clock.clone(),
    )
    .unwrap();

    let stats = scheduler.run(&shutdown_when(|| true)).unwrap();
    assert_eq!(stats.generations, 0);
    assert_eq!(stats.idle_sleeps, 0);
    assert_eq!(clock.now(), LoopTime::ZERO);
    assert_eq!(scheduler.engine().calls(), 0);
}

#[test]
fn test_idle_sleep_never_exceeds_quantum() {
    let mut config = ClockConfig::default();
    config.generation_interval = Duration::from_secs(10);
    config.render_interval = Duration::from_secs(10);
    config.idle_sleep = Duration::from_millis(20);

    let result = CadenceSimulation::new(SimulationConfig {
        clock: config,
        duration: Duration::from_millis(100),
        ..SimulationConfig::default()
    })
    .run()
    .unwrap();

    // 100ms of pure idling in 20ms steps, stopping just past the deadline
    assert_eq!(result.stats.idle_sleeps, 6);
    assert_eq!(result.ended_at, LoopTime::from_millis(120));
}

#[test]
fn test_noise_differs_between_cycles() {
    let shape = BatchShape::default();
    let assembler = BatchAssembler::new(shape);
    let mut noise = NoiseSource::with_seed(11);
    let digits = TimeDigits::from_hms(1, 2, 3);

    let mut first = sowai_core::InferenceRequest::for_shape(&shape);
    let mut second = sowai_core::InferenceRequest::for_shape(&shape);
    assembler
        .encode(&digits, &noise.sample(6, 100), &mut first)
        .unwrap();
    assembler
        .encode(&digits, &noise.sample(6, 100), &mut second)
        .unwrap();

    assert_eq!(first.labels(), second.labels());
    assert_ne!(first.noise(), second.noise());
}

proptest! {
    #[test]
    fn prop_frame_slots_match_digits(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
        let shape = BatchShape::default();
        let assembler = BatchAssembler::new(shape);
        let digits = TimeDigits::from_hms(h, m, s);

        let mut request = sowai_core::InferenceRequest::for_shape(&shape);
        assembler
            .encode(&digits, &NoiseSource::with_seed(1).sample(6, 100), &mut request)
            .unwrap();

        let mut engine = LabelEchoEngine::new(shape);
        let images: ImageBatch =
            sowai_runtime::InferenceEngine::run(&mut engine, &request).unwrap();

        let mut frame = CompositeFrame::for_shape(&shape);
        assembler.decode(images, &mut frame).unwrap();

        for (slot, digit) in digits.as_slice().iter().enumerate() {
            prop_assert_eq!(frame.pixel(slot * 28 + 13, 13)[0], label_shade(*digit));
        }
    }
}
