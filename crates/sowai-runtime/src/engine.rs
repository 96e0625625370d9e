//! Inference engine seam
//!
//! The generator itself is opaque. The scheduler only relies on the
//! contract `run(noise: f32[b, latent], label: i64[b]) -> image: f32[b, h, w]`.

use std::path::{Path, PathBuf};

use sowai_core::{BatchShape, ClockError, ClockResult, ImageBatch, InferenceRequest};
use tracing::info;

/// Maps a batch of (noise, label) to a batch of grayscale images
pub trait InferenceEngine {
    /// Geometry the engine was loaded for
    fn shape(&self) -> &BatchShape;

    /// Run one batch to completion
    fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn shape(&self) -> &BatchShape {
        (**self).shape()
    }

    fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch> {
        (**self).run(request)
    }
}

/// A model file located at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelArtifact {
    path: PathBuf,
    size: u64,
}

impl ModelArtifact {
    /// Resolve the artifact; a missing or non-file path is a startup failure
    pub fn locate(path: impl AsRef<Path>) -> ClockResult<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(ModelArtifact {
                path: path.to_path_buf(),
                size: meta.len(),
            }),
            _ => Err(ClockError::ModelMissing {
                path: path.to_path_buf(),
            }),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Load the generator named by `model_path`
///
/// Fails fast if the artifact is missing or no backend is compiled in.
pub fn load_engine(
    model_path: &Path,
    shape: BatchShape,
) -> ClockResult<Box<dyn InferenceEngine>> {
    let artifact = ModelArtifact::locate(model_path)?;
    info!(
        path = %artifact.path().display(),
        bytes = artifact.size(),
        "located model artifact"
    );

    #[cfg(feature = "onnx")]
    {
        let engine = crate::OnnxEngine::load(&artifact, shape)?;
        Ok(Box::new(engine))
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = shape;
        Err(ClockError::EngineUnavailable(
            "no inference backend compiled in (enable the `onnx` feature)".into(),
        ))
    }
}

/// Drop singleton axes after the batch axis
///
/// Generators commonly emit `[b, 1, h, w]`; the assembler wants
/// `[b, h, w]` or `[b, h*w]`.
pub fn squeeze_image_dims(dims: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(dims.len());
    if let Some((batch, rest)) = dims.split_first() {
        out.push(*batch);
        out.extend(rest.iter().copied().filter(|d| *d != 1));
    }
    out
}
