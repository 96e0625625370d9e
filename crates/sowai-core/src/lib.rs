//! SOWAI Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the clock pipeline:
//! - Clock digits (TimeDigits)
//! - Batch geometry (BatchShape)
//! - Model tensors (LatentBatch, InferenceRequest, ImageBatch)
//! - Loop time (LoopTime)
//! - Errors

pub mod digits;
pub mod error;
pub mod shape;
pub mod tensor;
pub mod time;

pub use digits::*;
pub use error::*;
pub use shape::*;
pub use tensor::*;
pub use time::*;
