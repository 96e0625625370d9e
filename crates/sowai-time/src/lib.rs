//! SOWAI Time - clocks and cadences for the digit clock
//!
//! This crate implements the time side of the pipeline:
//! - Local wall-clock reading and digit sampling
//! - Monotonic loop clocks (system and simulated)
//! - Dual cadence state for the generation and render triggers

pub mod cadence;
pub mod clock;
pub mod sampler;

pub use cadence::*;
pub use clock::*;
pub use sampler::*;
