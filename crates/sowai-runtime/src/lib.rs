//! SOWAI Runtime - the generation/render loop
//!
//! One thread, two cadences:
//! 1. Generation: sample digits, draw noise, encode, run the generator,
//!    decode into the composite frame
//! 2. Render: present the current composite frame
//! 3. Idle: sleep one bounded quantum when neither fired
//!
//! Inference runs inline and blocks rendering while it runs. The frame has
//! one writer and one reader on the same thread, so it is never locked.

pub mod config;
pub mod display;
pub mod engine;
pub mod noise;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod probe;
pub mod scheduler;
pub mod shutdown;

pub use config::*;
pub use display::*;
pub use engine::*;
pub use noise::*;
#[cfg(feature = "onnx")]
pub use onnx::*;
pub use probe::*;
pub use scheduler::*;
pub use shutdown::*;
