//! # lib-dsp
//!
//! Split-radix DFT engine and block-streaming FIR filters.
//!
//! This crate provides the mathematical core for signal processing:
//!
//! - **DFT**: complex split-radix transforms of any power-of-two size >= 8,
//!   in single or double precision, with precomputed twiddle tables
//! - **Overlap-add**: streaming FIR filtering of arbitrarily long kernels,
//!   with transform sharing across filter banks
//! - **Interpolation**: integer-rate upsampling with a windowed-sinc kernel
//! - **Windows**: Hann, Hamming and Blackman tapers

pub mod error;
pub mod float;
pub mod twiddle;
mod kernels;
mod split_radix;
pub mod fft;
pub mod convolution;
pub mod window;
pub mod interpolation;

pub use error::{DspError, DspResult};
pub use float::DftFloat;
pub use fft::{dft_product, Cdft, Linkage, ProductKind};
pub use convolution::{BlockSpectrum, OverlapAdd};
pub use interpolation::Interpolator;
pub use window::WindowType;
