//! # lib-types
//!
//! Core type definitions shared by the DSP workspace:
//! - Physical units with compile-time safety
//! - Waveform representation for uniformly sampled time series

pub mod units;
pub mod waveform;

pub use units::*;
pub use waveform::*;
