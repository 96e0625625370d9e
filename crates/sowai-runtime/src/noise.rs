//! Noise source - latent vectors for each generation cycle

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sowai_core::LatentBatch;

/// Uniform [-1, 1] latent sampler
///
/// One generator per process, seeded once. Not reproducible across runs
/// unless built with [`NoiseSource::with_seed`].
pub struct NoiseSource {
    rng: StdRng,
    range: Uniform<f32>,
    seed: u64,
}

impl NoiseSource {
    /// Seed from the current wall-clock time
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Deterministic source
    pub fn with_seed(seed: u64) -> Self {
        NoiseSource {
            rng: StdRng::seed_from_u64(seed),
            range: Uniform::new_inclusive(-1.0f32, 1.0f32),
            seed,
        }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fresh batch of `count` vectors of length `dim`
    pub fn sample(&mut self, count: usize, dim: usize) -> LatentBatch {
        let mut batch = LatentBatch::zeroed(count, dim);
        self.fill(&mut batch);
        batch
    }

    /// Overwrite every sample of `batch` in place
    pub fn fill(&mut self, batch: &mut LatentBatch) {
        for value in batch.as_mut_slice() {
            *value = self.range.sample(&mut self.rng);
        }
    }
}
