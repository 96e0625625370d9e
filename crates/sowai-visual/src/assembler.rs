//! Batch assembler - packs generator inputs and unpacks its outputs
//!
//! Buffers are owned by the caller and passed in by `&mut`; the assembler
//! never allocates per cycle. Every shape is checked before the first write,
//! so a failed call leaves the destination untouched.

use sowai_core::{
    BatchShape, ClockError, ClockResult, ImageBatch, InferenceRequest, LatentBatch, TimeDigits,
};

use crate::{CompositeFrame, CHANNELS};

/// Map a model intensity to a display byte
///
/// Scales by 255 and truncates. Out-of-range samples saturate to 0 or 255
/// and NaN maps to 0; nothing wraps.
#[inline]
pub fn intensity_to_byte(value: f32) -> u8 {
    (value * 255.0) as u8
}

/// Converts between clock digits, model tensors and the composite frame
#[derive(Clone, Copy, Debug)]
pub struct BatchAssembler {
    shape: BatchShape,
}

impl BatchAssembler {
    pub fn new(shape: BatchShape) -> Self {
        BatchAssembler { shape }
    }

    #[inline]
    pub fn shape(&self) -> &BatchShape {
        &self.shape
    }

    /// Pack digits as labels `[batch]` and latents as noise `[batch, latent]`
    pub fn encode(
        &self,
        digits: &TimeDigits,
        latents: &LatentBatch,
        request: &mut InferenceRequest,
    ) -> ClockResult<()> {
        let shape = &self.shape;

        ClockError::check_len("label batch", shape.batch_size, digits.len())?;
        ClockError::check_len("latent batch", shape.batch_size, latents.count())?;
        ClockError::check_len("latent dim", shape.latent_dim, latents.dim())?;
        ClockError::check_len("request noise", shape.noise_len(), request.noise().len())?;
        ClockError::check_len("request labels", shape.batch_size, request.labels().len())?;

        request.noise_mut().copy_from_slice(latents.as_slice());
        for (label, digit) in request.labels_mut().iter_mut().zip(digits.as_slice()) {
            *label = i64::from(*digit);
        }

        Ok(())
    }

    /// Unpack a generated batch into the composite frame
    ///
    /// Source samples are read at the mirrored coordinate
    /// `(w-1-x, h-1-y)` and written to row `y`, column `b*w + (w-1-x)`,
    /// so the strip comes out upright. Consumes the batch.
    pub fn decode(&self, images: ImageBatch, frame: &mut CompositeFrame) -> ClockResult<()> {
        self.check_images(&images)?;
        ClockError::check_len("frame width", self.shape.frame_width(), frame.width())?;
        ClockError::check_len("frame height", self.shape.frame_height(), frame.height())?;

        let w = self.shape.image_width;
        let h = self.shape.image_height;
        let stride = frame.width() * CHANNELS;
        let pixels = frame.pixels_mut();

        for b in 0..self.shape.batch_size {
            let image = images.image(b);
            for y in 0..h {
                let src_row = (h - 1 - y) * w;
                let dst_row = y * stride;
                for x in 0..w {
                    let src_x = w - 1 - x;
                    let value = intensity_to_byte(image[src_row + src_x]);

                    let i = dst_row + (b * w + src_x) * CHANNELS;
                    pixels[i..i + CHANNELS].fill(value);
                }
            }
        }

        frame.mark_rebuilt();
        Ok(())
    }

    fn check_images(&self, images: &ImageBatch) -> ClockResult<()> {
        let shape = &self.shape;
        let dims = images.dims();

        ClockError::check_len("image batch", shape.batch_size, images.batch())?;
        match dims.len() {
            2 => {
                ClockError::check_len("image pixels", shape.pixels_per_image(), dims[1])?;
            }
            3 => {
                ClockError::check_len("image height", shape.image_height, dims[1])?;
                ClockError::check_len("image width", shape.image_width, dims[2])?;
            }
            rank => return Err(ClockError::ShapeMismatch {
                what: "image rank",
                expected: 3,
                actual: rank,
            }),
        }
        Ok(())
    }
}
