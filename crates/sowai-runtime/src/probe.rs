//! One-shot generator probe
//!
//! Runs a single batch for one digit outside the scheduler, times it, and
//! keeps the first image for an ASCII preview. Useful to check a model file
//! before starting the clock.

use std::time::{Duration, Instant};

use sowai_core::{ClockError, ClockResult, InferenceRequest, LatentBatch};
use sowai_visual::render_ascii;
use tracing::info;

use crate::{InferenceEngine, NoiseSource};

/// Result of a probe run
#[derive(Clone, Debug)]
pub struct ProbeReport {
    pub digit: u8,
    /// Wall time of the inference call alone
    pub latency: Duration,
    pub width: usize,
    pub height: usize,
    /// Raw samples of the first image, row-major
    pub image: Vec<f32>,
}

impl ProbeReport {
    /// ASCII rendering of the raw samples
    pub fn ascii(&self) -> String {
        render_ascii(&self.image, self.width, self.height)
    }
}

/// Generate `digit` once and time the call
pub fn probe_digit<E: InferenceEngine + ?Sized>(
    engine: &mut E,
    digit: u8,
    noise: &mut NoiseSource,
) -> ClockResult<ProbeReport> {
    if digit > 9 {
        return Err(ClockError::InvalidConfig(format!(
            "probe digit must be 0-9, got {}",
            digit
        )));
    }

    let shape = *engine.shape();
    let mut latents = LatentBatch::zeroed(shape.batch_size, shape.latent_dim);
    noise.fill(&mut latents);

    let mut request = InferenceRequest::for_shape(&shape);
    request.noise_mut().copy_from_slice(latents.as_slice());
    request.labels_mut().fill(i64::from(digit));

    let started = Instant::now();
    let images = engine.run(&request)?;
    let latency = started.elapsed();

    ClockError::check_len("probe batch", shape.batch_size, images.batch())?;
    ClockError::check_len("probe image", shape.pixels_per_image(), images.pixels_per_image())?;

    info!(digit, latency_us = latency.as_micros() as u64, "probe completed");

    Ok(ProbeReport {
        digit,
        latency,
        width: shape.image_width,
        height: shape.image_height,
        image: images.image(0).to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sowai_core::{BatchShape, ImageBatch};

    /// Engine drawing a vertical bar whose column is the label
    struct Bar {
        shape: BatchShape,
        seen_labels: Vec<i64>,
    }

    impl InferenceEngine for Bar {
        fn shape(&self) -> &BatchShape {
            &self.shape
        }

        fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch> {
            self.seen_labels = request.labels().to_vec();
            let (w, h) = (self.shape.image_width, self.shape.image_height);
            let mut images = ImageBatch::filled(&self.shape, -1.0);
            for (b, label) in request.labels().iter().enumerate() {
                for y in 0..h {
                    images.as_mut_slice()[b * w * h + y * w + *label as usize] = 1.0;
                }
            }
            Ok(images)
        }
    }

    fn bar() -> Bar {
        Bar {
            shape: BatchShape {
                image_width: 10,
                image_height: 3,
                ..BatchShape::default()
            },
            seen_labels: Vec::new(),
        }
    }

    #[test]
    fn test_probe_labels_whole_batch() {
        let mut engine = bar();
        let report = probe_digit(&mut engine, 4, &mut NoiseSource::with_seed(5)).unwrap();

        assert_eq!(engine.seen_labels, vec![4; 6]);
        assert_eq!(report.digit, 4);
        assert_eq!(report.image.len(), 30);
    }

    #[test]
    fn test_probe_ascii() {
        let mut engine = bar();
        let report = probe_digit(&mut engine, 2, &mut NoiseSource::with_seed(5)).unwrap();

        let line = "    ##              \n";
        assert_eq!(report.ascii(), line.repeat(3));
    }

    #[test]
    fn test_probe_rejects_non_digit() {
        let mut engine = bar();
        let err = probe_digit(&mut engine, 10, &mut NoiseSource::with_seed(5)).unwrap_err();
        assert!(matches!(err, ClockError::InvalidConfig(_)));
    }
}
