//! Model tensors: latent noise, inference requests and generated images
//!
//! All tensors are flat row-major `f32`/`i64` buffers with explicit dims.

use crate::{BatchShape, ClockError, ClockResult};

/// A batch of latent vectors
///
/// Regenerated every generation cycle; carries no identity across cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct LatentBatch {
    count: usize,
    dim: usize,
    data: Vec<f32>,
}

impl LatentBatch {
    /// Zero-filled batch of `count` vectors of length `dim`
    pub fn zeroed(count: usize, dim: usize) -> Self {
        LatentBatch {
            count,
            dim,
            data: vec![0.0; count * dim],
        }
    }

    /// Wrap existing samples
    pub fn from_vec(count: usize, dim: usize, data: Vec<f32>) -> ClockResult<Self> {
        ClockError::check_len("latent batch", count * dim, data.len())?;
        Ok(LatentBatch { count, dim, data })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

/// Inputs for one inference call: `noise: f32[batch, latent]`, `label: i64[batch]`
///
/// Allocated once for a shape and refilled in place every cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceRequest {
    batch_size: usize,
    latent_dim: usize,
    noise: Vec<f32>,
    labels: Vec<i64>,
}

impl InferenceRequest {
    /// Zeroed request sized for `shape`
    pub fn for_shape(shape: &BatchShape) -> Self {
        InferenceRequest {
            batch_size: shape.batch_size,
            latent_dim: shape.latent_dim,
            noise: vec![0.0; shape.noise_len()],
            labels: vec![0; shape.batch_size],
        }
    }

    /// `[batch, latent_dim]`
    pub fn noise_dims(&self) -> [usize; 2] {
        [self.batch_size, self.latent_dim]
    }

    /// `[batch]`
    pub fn label_dims(&self) -> [usize; 1] {
        [self.batch_size]
    }

    #[inline]
    pub fn noise(&self) -> &[f32] {
        &self.noise
    }

    #[inline]
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    #[inline]
    pub fn noise_mut(&mut self) -> &mut [f32] {
        &mut self.noise
    }

    #[inline]
    pub fn labels_mut(&mut self) -> &mut [i64] {
        &mut self.labels
    }
}

/// Generated grayscale images, nominally in [0, 1]
///
/// Accepted layouts are `[batch, height, width]` and `[batch, height * width]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch {
    dims: Vec<usize>,
    data: Vec<f32>,
}

impl ImageBatch {
    /// Wrap engine output; `data.len()` must equal the product of `dims`
    pub fn new(dims: Vec<usize>, data: Vec<f32>) -> ClockResult<Self> {
        let expected: usize = dims.iter().product();
        ClockError::check_len("image batch", expected, data.len())?;
        Ok(ImageBatch { dims, data })
    }

    /// Batch where every sample is `value`
    pub fn filled(shape: &BatchShape, value: f32) -> Self {
        ImageBatch {
            dims: shape.image_dims().to_vec(),
            data: vec![value; shape.image_len()],
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Leading dimension
    pub fn batch(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Samples per image (product of trailing dims)
    pub fn pixels_per_image(&self) -> usize {
        self.dims.iter().skip(1).product()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Samples of image `index`
    pub fn image(&self, index: usize) -> &[f32] {
        let len = self.pixels_per_image();
        &self.data[index * len..(index + 1) * len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latent_batch_from_vec() {
        let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let batch = LatentBatch::from_vec(2, 3, data).unwrap();

        assert_eq!((batch.count(), batch.dim()), (2, 3));
        assert_eq!(&batch.as_slice()[3..], &[3.0, 4.0, 5.0]);
        assert!(LatentBatch::from_vec(2, 3, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_request_sized_for_shape() {
        let request = InferenceRequest::for_shape(&BatchShape::default());
        assert_eq!(request.noise_dims(), [6, 100]);
        assert_eq!(request.label_dims(), [6]);
        assert_eq!(request.noise().len(), 600);
        assert_eq!(request.labels().len(), 6);
    }

    #[test]
    fn test_image_batch_layouts() {
        let shape = BatchShape::default();

        let cube = ImageBatch::new(vec![6, 28, 28], vec![0.0; 6 * 784]).unwrap();
        let flat = ImageBatch::new(vec![6, 784], vec![0.0; 6 * 784]).unwrap();
        assert_eq!(cube.pixels_per_image(), shape.pixels_per_image());
        assert_eq!(flat.pixels_per_image(), shape.pixels_per_image());
        assert_eq!(flat.batch(), 6);

        assert!(ImageBatch::new(vec![6, 28, 28], vec![0.0; 10]).is_err());
    }

    #[test]
    fn test_image_slices() {
        let mut images = ImageBatch::filled(&BatchShape::default(), 0.0);
        images.as_mut_slice()[784] = 1.0;

        assert_eq!(images.image(0).iter().sum::<f32>(), 0.0);
        assert_eq!(images.image(1)[0], 1.0);
    }
}
