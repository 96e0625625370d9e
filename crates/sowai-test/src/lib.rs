//! SOWAI Test Harness - deterministic pipeline testing
//!
//! This crate provides:
//! - Fake inference engines (constant, label echo, failing, slow)
//! - A recording display surface with scripted resizes
//! - Cadence simulation under a simulated clock
//! - End-to-end integration tests

pub mod fakes;
pub mod simulator;

#[cfg(test)]
mod integration;

pub use fakes::*;
pub use simulator::*;
