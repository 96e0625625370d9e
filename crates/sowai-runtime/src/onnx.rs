//! ONNX generator backend
//!
//! Expects a conditional generator with inputs `noise: f32[b, latent]`,
//! `label: i64[b]` (in that order) and a single image output.

use sowai_core::{BatchShape, ClockError, ClockResult, ImageBatch, InferenceRequest};
use tracing::info;
use tract_onnx::prelude::*;

use crate::{squeeze_image_dims, InferenceEngine, ModelArtifact};

/// Generator loaded from an ONNX file and optimized for a fixed batch
pub struct OnnxEngine {
    plan: TypedRunnableModel<TypedModel>,
    shape: BatchShape,
}

impl OnnxEngine {
    /// Load and optimize the model for `shape`
    pub fn load(artifact: &ModelArtifact, shape: BatchShape) -> ClockResult<Self> {
        let unavailable =
            |e: TractError| ClockError::EngineUnavailable(format!("{}: {}", artifact.path().display(), e));

        let plan = tract_onnx::onnx()
            .model_for_path(artifact.path())
            .and_then(|model| model.with_input_fact(0, f32::fact(shape.noise_dims()).into()))
            .and_then(|model| model.with_input_fact(1, i64::fact(shape.label_dims()).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(unavailable)?;

        info!(path = %artifact.path().display(), "onnx generator loaded");
        Ok(OnnxEngine { plan, shape })
    }
}

impl InferenceEngine for OnnxEngine {
    fn shape(&self) -> &BatchShape {
        &self.shape
    }

    fn run(&mut self, request: &InferenceRequest) -> ClockResult<ImageBatch> {
        let failed = |e: TractError| ClockError::InferenceFailed(e.to_string());

        let noise = Tensor::from_shape(&request.noise_dims(), request.noise()).map_err(failed)?;
        let labels = Tensor::from_shape(&request.label_dims(), request.labels()).map_err(failed)?;

        let outputs = self
            .plan
            .run(tvec!(noise.into(), labels.into()))
            .map_err(failed)?;
        let image = outputs
            .first()
            .ok_or_else(|| ClockError::InferenceFailed("model produced no output".into()))?;
        let view = image.to_array_view::<f32>().map_err(failed)?;

        ImageBatch::new(squeeze_image_dims(view.shape()), view.iter().copied().collect())
    }
}
