//! Batch geometry shared by the assembler and the inference engine

use serde::{Deserialize, Serialize};

use crate::{ClockError, ClockResult, DIGIT_COUNT};

/// Geometry of one generation batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchShape {
    /// Images per batch (one per clock digit)
    pub batch_size: usize,
    /// Width of a single generated image
    pub image_width: usize,
    /// Height of a single generated image
    pub image_height: usize,
    /// Length of each latent vector
    pub latent_dim: usize,
}

impl Default for BatchShape {
    fn default() -> Self {
        // MNIST-sized conditional generator
        BatchShape {
            batch_size: DIGIT_COUNT,
            image_width: 28,
            image_height: 28,
            latent_dim: 100,
        }
    }
}

impl BatchShape {
    /// Samples in one image
    #[inline]
    pub fn pixels_per_image(&self) -> usize {
        self.image_width * self.image_height
    }

    /// Samples in the whole image batch
    #[inline]
    pub fn image_len(&self) -> usize {
        self.batch_size * self.pixels_per_image()
    }

    /// Elements in the noise tensor
    #[inline]
    pub fn noise_len(&self) -> usize {
        self.batch_size * self.latent_dim
    }

    /// Width of the composite strip
    #[inline]
    pub fn frame_width(&self) -> usize {
        self.batch_size * self.image_width
    }

    #[inline]
    pub fn frame_height(&self) -> usize {
        self.image_height
    }

    /// `[batch, latent_dim]`
    pub fn noise_dims(&self) -> [usize; 2] {
        [self.batch_size, self.latent_dim]
    }

    /// `[batch]`
    pub fn label_dims(&self) -> [usize; 1] {
        [self.batch_size]
    }

    /// `[batch, height, width]`
    pub fn image_dims(&self) -> [usize; 3] {
        [self.batch_size, self.image_height, self.image_width]
    }

    /// Reject geometry the clock cannot display
    pub fn validate(&self) -> ClockResult<()> {
        if self.batch_size != DIGIT_COUNT {
            return Err(ClockError::InvalidConfig(format!(
                "batch size must be {} (one image per clock digit), got {}",
                DIGIT_COUNT, self.batch_size
            )));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ClockError::InvalidConfig(
                "image dimensions must be non-zero".into(),
            ));
        }
        if self.latent_dim == 0 {
            return Err(ClockError::InvalidConfig(
                "latent dimension must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let shape = BatchShape::default();
        assert_eq!(shape.noise_dims(), [6, 100]);
        assert_eq!(shape.label_dims(), [6]);
        assert_eq!(shape.image_dims(), [6, 28, 28]);
        assert_eq!(shape.frame_width(), 168);
        assert_eq!(shape.frame_height(), 28);
        assert_eq!(shape.image_len(), 6 * 784);
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut shape = BatchShape::default();
        shape.batch_size = 4;
        assert!(matches!(shape.validate(), Err(ClockError::InvalidConfig(_))));

        let mut shape = BatchShape::default();
        shape.image_height = 0;
        assert!(shape.validate().is_err());

        let mut shape = BatchShape::default();
        shape.latent_dim = 0;
        assert!(shape.validate().is_err());
    }
}
