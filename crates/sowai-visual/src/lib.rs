//! SOWAI Visual - from model tensors to pixels
//!
//! Digit images come out of the generator as a `[batch, h, w]` float tensor.
//! This crate packs clock digits and noise into the generator's input
//! layout, and unpacks its output into a single RGB strip:
//!
//! ```text
//! TimeDigits + LatentBatch → encode → InferenceRequest
//! ImageBatch → decode → CompositeFrame (batch·w × h, RGB)
//! ```

pub mod ascii;
pub mod assembler;
pub mod frame;

pub use ascii::*;
pub use assembler::*;
pub use frame::*;
