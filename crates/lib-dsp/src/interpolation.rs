//! Integer-rate FIR interpolation.
//!
//! The input is zero-stuffed by the rate and lowpass filtered with a
//! Hamming-windowed sinc kernel through an [`OverlapAdd`] engine, so the
//! interpolator streams block by block like any other FIR filter.

use crate::convolution::OverlapAdd;
use crate::error::{DspError, DspResult};
use crate::float::DftFloat;
use crate::window::{generate_window, WindowType};
use std::f64::consts::PI;

/// Spread `src` by `rate`: `dst[i * rate] = src[i]`, zeros in between.
///
/// `dst` must hold at least `src.len() * rate` samples; only that prefix is written.
pub fn stretch<T: DftFloat>(src: &[T], rate: usize, dst: &mut [T]) -> DspResult<()> {
    let needed = src.len() * rate;
    if dst.len() < needed {
        return Err(DspError::InsufficientData {
            needed,
            got: dst.len(),
        });
    }

    dst[..needed].fill(T::zero());
    for (i, &v) in src.iter().enumerate() {
        dst[i * rate] = v;
    }
    Ok(())
}

/// Interpolation kernel of length `2 * rate * design_factor + 1`.
///
/// The center tap is 1 and every tap at a nonzero multiple of `rate` from the
/// center is 0, so input samples pass through unchanged.
fn design_kernel(rate: usize, design_factor: usize) -> Vec<f64> {
    let half = rate * design_factor;
    let mut kernel = generate_window(WindowType::Hamming, 2 * half + 1);

    for i in 1..=half {
        let x = PI * i as f64 / rate as f64;
        kernel[half + i] *= x.sin() / x;
        kernel[half - i] = kernel[half + i];
    }
    kernel
}

/// Streaming upsampler by an integer factor.
#[derive(Debug)]
pub struct Interpolator<T: DftFloat> {
    rate: usize,
    block_size: usize,
    half: usize,
    overlap_add: OverlapAdd<T>,
    buffer: Vec<T>,
}

impl<T: DftFloat> Interpolator<T> {
    /// Create an interpolator consuming `block_size` input samples per call.
    ///
    /// `design_factor` sets the kernel half-length in input samples; larger
    /// values give a sharper lowpass and a longer delay.
    pub fn new(rate: usize, design_factor: usize, block_size: usize) -> DspResult<Self> {
        if rate == 0 {
            return Err(DspError::InvalidConfig("interpolation rate must be positive".into()));
        }
        if design_factor == 0 {
            return Err(DspError::InvalidConfig("design factor must be positive".into()));
        }
        if block_size == 0 {
            return Err(DspError::InvalidConfig("block size must be positive".into()));
        }

        let kernel: Vec<T> = design_kernel(rate, design_factor)
            .into_iter()
            .map(T::cast)
            .collect();
        let overlap_add = OverlapAdd::new(&kernel, block_size * rate)?;

        tracing::debug!(
            "Interpolator: rate={}, design_factor={}, kernel_len={}, block_size={}",
            rate,
            design_factor,
            kernel.len(),
            block_size
        );

        Ok(Self {
            rate,
            block_size,
            half: rate * design_factor,
            overlap_add,
            buffer: vec![T::zero(); block_size * rate],
        })
    }

    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Input samples consumed per call.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Output samples produced per call.
    #[inline]
    pub fn output_block_size(&self) -> usize {
        self.block_size * self.rate
    }

    /// Filter delay in output samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.half
    }

    #[inline]
    pub fn kernel_length(&self) -> usize {
        self.overlap_add.kernel_length()
    }

    /// Upsample the first `block_size` samples of `block` into the first
    /// `block_size * rate` samples of `out`.
    pub fn interpolate(&mut self, block: &[T], out: &mut [T]) -> DspResult<()> {
        if block.len() < self.block_size {
            return Err(DspError::InsufficientData {
                needed: self.block_size,
                got: block.len(),
            });
        }
        if out.len() < self.output_block_size() {
            return Err(DspError::InsufficientData {
                needed: self.output_block_size(),
                got: out.len(),
            });
        }

        stretch(&block[..self.block_size], self.rate, &mut self.buffer)?;
        self.overlap_add.filter(&self.buffer, out)
    }

    /// Emit one output block of the carried filter tail.
    pub fn flush(&mut self, out: &mut [T]) -> DspResult<()> {
        self.overlap_add.flush(out)
    }

    /// Clear carried state for a new stream.
    pub fn initialize(&mut self) {
        self.overlap_add.initialize();
    }

    /// Upsample a complete signal, compensating the filter delay.
    ///
    /// Returns `signal.len() * rate` samples with `out[i * rate] == signal[i]`.
    pub fn upsample(&mut self, signal: &[T]) -> DspResult<Vec<T>> {
        if signal.is_empty() {
            return Err(DspError::InsufficientData { needed: 1, got: 0 });
        }

        self.initialize();
        let bs = self.block_size;
        let obs = self.output_block_size();
        let output_len = signal.len() * self.rate;
        let num_blocks = (self.half + output_len).div_ceil(obs);

        let mut output = vec![T::zero(); num_blocks * obs];
        let mut block = vec![T::zero(); bs];

        for (i, out) in output.chunks_exact_mut(obs).enumerate() {
            let start = i * bs;
            if start < signal.len() {
                let end = (start + bs).min(signal.len());
                block[..end - start].copy_from_slice(&signal[start..end]);
                block[end - start..].fill(T::zero());
                self.interpolate(&block, out)?;
            } else {
                self.flush(out)?;
            }
        }

        output.drain(..self.half);
        output.truncate(output_len);
        Ok(output)
    }
}
