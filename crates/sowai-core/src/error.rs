//! Error types for the SOWAI clock

use std::path::PathBuf;

use thiserror::Error;

/// Clock pipeline errors
///
/// Every variant is fatal to the pipeline. Nothing is retried.
#[derive(Error, Debug)]
pub enum ClockError {
    // Startup errors
    #[error("Model artifact not found: {}", path.display())]
    ModelMissing { path: PathBuf },

    #[error("Inference engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Shape contract errors
    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    // Steady-state errors
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Display failed: {0}")]
    DisplayFailed(String),
}

impl ClockError {
    /// True for errors raised before the scheduler loop starts
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            ClockError::ModelMissing { .. }
                | ClockError::EngineUnavailable(_)
                | ClockError::InvalidConfig(_)
        )
    }

    /// Check a length against the expected one
    #[inline]
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> ClockResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ClockError::ShapeMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}

/// Result type for clock operations
pub type ClockResult<T> = Result<T, ClockError>;
