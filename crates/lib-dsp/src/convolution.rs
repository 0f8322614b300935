//! Streaming FIR filtering with the overlap-add method.
//!
//! [`OverlapAdd`] transforms its kernel once, then filters a stream one
//! fixed-size block at a time.  Each block is zero-padded to the transform
//! size, multiplied with the kernel spectrum and inverse transformed.  The
//! resulting convolution tail is summed into a shift register that carries
//! the not-yet-emitted output from one block to the next.  Concatenating the
//! emitted blocks, followed by [`OverlapAdd::flush`] at the end of the stream,
//! reproduces the linear convolution of the whole stream.
//!
//! # Submission order
//!
//! Blocks must be contiguous, non-overlapping and submitted in stream order.
//! The engine cannot detect a reordered stream; it only enforces the block
//! length.
//!
//! # Shared transforms
//!
//! A bank of filters with equal kernel lengths can share one transform: the
//! first engine is built with [`OverlapAdd::new`] and owns the transform, the
//! others attach with [`OverlapAdd::slave`].  Sharing engines are `!Send` and
//! therefore stay on one thread.  A slave that outlives its master fails with
//! [`DspError::TransformReleased`].

use crate::error::{DspError, DspResult};
use crate::fft::{dft_product, expect_len, Cdft, ProductKind};
use crate::float::DftFloat;
use lib_types::waveform::Waveform;
use std::rc::{Rc, Weak};

/// Transform used by an engine: owned (master) or borrowed from a master (slave).
#[derive(Debug)]
enum TransformHandle<T: DftFloat> {
    Master(Rc<Cdft<T>>),
    Slave(Weak<Cdft<T>>),
}

impl<T: DftFloat> TransformHandle<T> {
    fn get(&self) -> DspResult<Rc<Cdft<T>>> {
        match self {
            Self::Master(dft) => Ok(Rc::clone(dft)),
            Self::Slave(dft) => dft.upgrade().ok_or(DspError::TransformReleased),
        }
    }
}

/// Transform of one zero-padded input block.
///
/// Produced by [`OverlapAdd::transform_block`] and consumed by
/// [`OverlapAdd::filter_spectrum`], so one block can be transformed once and
/// filtered by every engine of the same transform size.
#[derive(Clone, Debug, Default)]
pub struct BlockSpectrum<T> {
    padded: Vec<T>,
    zeros: Vec<T>,
    re: Vec<T>,
    im: Vec<T>,
}

impl<T: DftFloat> BlockSpectrum<T> {
    /// Zeroed spectrum buffer for transform size `nfft`.
    pub fn zeros(nfft: usize) -> Self {
        Self {
            padded: vec![T::zero(); nfft],
            zeros: vec![T::zero(); nfft],
            re: vec![T::zero(); nfft],
            im: vec![T::zero(); nfft],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.re.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Real part of the spectrum.
    pub fn re(&self) -> &[T] {
        &self.re
    }

    /// Imaginary part of the spectrum.
    pub fn im(&self) -> &[T] {
        &self.im
    }
}

/// Overlap-add block filter.
#[derive(Debug)]
pub struct OverlapAdd<T: DftFloat> {
    transform: TransformHandle<T>,

    /// Samples consumed and emitted per call.
    block_size: usize,

    /// Transform size, the smallest power of two >= kernel_len + block_size - 1.
    nfft: usize,

    kernel_len: usize,

    /// Kernel spectrum, fixed after construction.
    kernel_re: Vec<T>,
    kernel_im: Vec<T>,

    /// Unconsumed convolution tail carried between blocks.
    shift_register: Vec<T>,

    input: BlockSpectrum<T>,
    product_re: Vec<T>,
    product_im: Vec<T>,
    segment_re: Vec<T>,
    segment_im: Vec<T>,

    blocks_emitted: u64,
}

impl<T: DftFloat> OverlapAdd<T> {
    /// Create a master engine for `kernel`, consuming `block_size` samples per call.
    pub fn new(kernel: &[T], block_size: usize) -> DspResult<Self> {
        if kernel.is_empty() {
            return Err(DspError::InvalidConfig("filter kernel is empty".into()));
        }
        if block_size == 0 {
            return Err(DspError::InvalidConfig("block size must be positive".into()));
        }

        let dft = Cdft::with_min_size(kernel.len() + block_size - 1)?;

        tracing::debug!(
            "OverlapAdd: kernel_len={}, block_size={}, nfft={}",
            kernel.len(),
            block_size,
            dft.size()
        );

        Self::build(kernel, block_size, TransformHandle::Master(Rc::new(dft)))
    }

    /// Create a slave engine that shares `master`'s transform.
    ///
    /// The kernel must have the master's length; the block size is taken from
    /// the master.
    pub fn slave(kernel: &[T], master: &OverlapAdd<T>) -> DspResult<Self> {
        if kernel.len() != master.kernel_len {
            return Err(DspError::KernelLengthMismatch {
                master: master.kernel_len,
                slave: kernel.len(),
            });
        }

        let dft = master.transform.get()?;

        tracing::trace!(
            "OverlapAdd: slave attached, kernel_len={}, nfft={}",
            kernel.len(),
            dft.size()
        );

        Self::build(
            kernel,
            master.block_size,
            TransformHandle::Slave(Rc::downgrade(&dft)),
        )
    }

    fn build(kernel: &[T], block_size: usize, transform: TransformHandle<T>) -> DspResult<Self> {
        let dft = transform.get()?;
        let nfft = dft.size();

        let mut padded = vec![T::zero(); nfft];
        padded[..kernel.len()].copy_from_slice(kernel);
        let zeros = vec![T::zero(); nfft];
        let mut kernel_re = vec![T::zero(); nfft];
        let mut kernel_im = vec![T::zero(); nfft];
        dft.forward(&padded, &zeros, &mut kernel_re, &mut kernel_im)?;

        Ok(Self {
            transform,
            block_size,
            nfft,
            kernel_len: kernel.len(),
            kernel_re,
            kernel_im,
            shift_register: vec![T::zero(); nfft],
            input: BlockSpectrum::zeros(nfft),
            product_re: vec![T::zero(); nfft],
            product_im: vec![T::zero(); nfft],
            segment_re: vec![T::zero(); nfft],
            segment_im: vec![T::zero(); nfft],
            blocks_emitted: 0,
        })
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.nfft
    }

    #[inline]
    pub fn kernel_length(&self) -> usize {
        self.kernel_len
    }

    /// True if this engine borrows its transform from a master.
    #[inline]
    pub fn is_slave(&self) -> bool {
        matches!(self.transform, TransformHandle::Slave(_))
    }

    /// Blocks emitted by `filter` and `flush` since construction or the last
    /// [`initialize`](Self::initialize).
    #[inline]
    pub fn blocks_emitted(&self) -> u64 {
        self.blocks_emitted
    }

    /// Number of `flush` calls needed to drain the tail after the last input block.
    #[inline]
    pub fn tail_blocks(&self) -> usize {
        (self.kernel_len - 1).div_ceil(self.block_size)
    }

    /// Zeroed buffer sized for [`transform_block`](Self::transform_block).
    pub fn spectrum_buffer(&self) -> BlockSpectrum<T> {
        BlockSpectrum::zeros(self.nfft)
    }

    /// Filter the first `block_size` samples of `src`, writing `block_size`
    /// output samples to the front of `dst`.
    pub fn filter(&mut self, src: &[T], dst: &mut [T]) -> DspResult<()> {
        self.check_block(src.len())?;
        self.check_block(dst.len())?;

        let mut input = std::mem::take(&mut self.input);
        let result = self
            .transform_block(src, &mut input)
            .and_then(|_| self.filter_spectrum(&input, dst));
        self.input = input;
        result
    }

    /// Transform the first `block_size` samples of `block`, zero-padded to the
    /// transform size, into `spectrum`.
    pub fn transform_block(&self, block: &[T], spectrum: &mut BlockSpectrum<T>) -> DspResult<()> {
        self.check_block(block.len())?;
        expect_len(self.nfft, spectrum.len())?;
        let dft = self.transform.get()?;

        let BlockSpectrum {
            padded,
            zeros,
            re,
            im,
        } = spectrum;
        padded[..self.block_size].copy_from_slice(&block[..self.block_size]);
        padded[self.block_size..].fill(T::zero());
        dft.forward(padded, zeros, re, im)
    }

    /// Filter a block already transformed with
    /// [`transform_block`](Self::transform_block) by an engine of the same
    /// transform size.
    pub fn filter_spectrum(&mut self, spectrum: &BlockSpectrum<T>, dst: &mut [T]) -> DspResult<()> {
        expect_len(self.nfft, spectrum.len())?;
        self.check_block(dst.len())?;
        let dft = self.transform.get()?;

        self.product_re.copy_from_slice(&spectrum.re);
        self.product_im.copy_from_slice(&spectrum.im);
        dft_product(
            &self.kernel_re,
            &self.kernel_im,
            &mut self.product_re,
            &mut self.product_im,
            ProductKind::Convolution,
        )?;
        dft.inverse(
            &self.product_re,
            &self.product_im,
            &mut self.segment_re,
            &mut self.segment_im,
        )?;

        for (acc, &v) in self.shift_register.iter_mut().zip(self.segment_re.iter()) {
            *acc += v;
        }
        self.emit(dst);
        Ok(())
    }

    /// Emit the next `block_size` samples of the carried tail without new input.
    pub fn flush(&mut self, dst: &mut [T]) -> DspResult<()> {
        self.check_block(dst.len())?;
        self.emit(dst);
        Ok(())
    }

    /// Clear the carried state for an unrelated stream.  The kernel spectrum is kept.
    pub fn initialize(&mut self) {
        self.shift_register.fill(T::zero());
        self.blocks_emitted = 0;
    }

    /// Linear convolution of a complete signal: `signal.len() + kernel_length - 1` samples.
    ///
    /// Resets the engine first and leaves the tail drained.
    pub fn convolve(&mut self, signal: &[T]) -> DspResult<Vec<T>> {
        if signal.is_empty() {
            return Err(DspError::InsufficientData { needed: 1, got: 0 });
        }

        self.initialize();
        let bs = self.block_size;
        let output_len = signal.len() + self.kernel_len - 1;
        let num_blocks = output_len.div_ceil(bs);

        let mut output = vec![T::zero(); num_blocks * bs];
        let mut block = vec![T::zero(); bs];

        for (i, out) in output.chunks_exact_mut(bs).enumerate() {
            let start = i * bs;
            if start < signal.len() {
                let end = (start + bs).min(signal.len());
                block[..end - start].copy_from_slice(&signal[start..end]);
                block[end - start..].fill(T::zero());
                self.filter(&block, out)?;
            } else {
                self.flush(out)?;
            }
        }

        output.truncate(output_len);
        Ok(output)
    }

    fn emit(&mut self, dst: &mut [T]) {
        let bs = self.block_size;
        dst[..bs].copy_from_slice(&self.shift_register[..bs]);
        self.shift_register.copy_within(bs.., 0);
        let tail = self.nfft - bs;
        self.shift_register[tail..].fill(T::zero());
        self.blocks_emitted += 1;
    }

    #[inline]
    fn check_block(&self, got: usize) -> DspResult<()> {
        if got < self.block_size {
            return Err(DspError::InsufficientData {
                needed: self.block_size,
                got,
            });
        }
        Ok(())
    }
}

impl OverlapAdd<f64> {
    /// Convolve a waveform, returning a new waveform on the same time grid.
    pub fn convolve_waveform(&mut self, input: &Waveform) -> DspResult<Waveform> {
        let samples = self.convolve(&input.samples)?;
        Ok(Waveform::new(samples, input.dt, input.t_start))
    }
}

/// Direct convolution (for comparison/validation).
///
/// This is O(n*m) and should only be used for short signals.
pub fn direct_convolve<T: DftFloat>(signal: &[T], kernel: &[T]) -> Vec<T> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let mut output = vec![T::zero(); signal.len() + kernel.len() - 1];
    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            output[i + j] += s * k;
        }
    }
    output
}

/// Convolution with a single transform covering the whole output.
///
/// Good for moderate-sized signals where block streaming isn't needed.
pub fn fft_convolve<T: DftFloat>(signal: &[T], kernel: &[T]) -> DspResult<Vec<T>> {
    if signal.is_empty() || kernel.is_empty() {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }

    let output_len = signal.len() + kernel.len() - 1;
    let dft = Cdft::<T>::with_min_size(output_len)?;
    let n = dft.size();
    let zeros = vec![T::zero(); n];

    let mut padded = vec![T::zero(); n];
    padded[..signal.len()].copy_from_slice(signal);
    let mut sr = vec![T::zero(); n];
    let mut si = vec![T::zero(); n];
    dft.forward(&padded, &zeros, &mut sr, &mut si)?;

    padded.fill(T::zero());
    padded[..kernel.len()].copy_from_slice(kernel);
    let mut kr = vec![T::zero(); n];
    let mut ki = vec![T::zero(); n];
    dft.forward(&padded, &zeros, &mut kr, &mut ki)?;

    dft_product(&kr, &ki, &mut sr, &mut si, ProductKind::Convolution)?;

    let mut yr = vec![T::zero(); n];
    let mut yi = vec![T::zero(); n];
    dft.inverse(&sr, &si, &mut yr, &mut yi)?;

    yr.truncate(output_len);
    Ok(yr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::units::Seconds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_signal(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    /// Stream `signal` through `engine` block by block, then drain the tail.
    fn stream(engine: &mut OverlapAdd<f64>, signal: &[f64]) -> Vec<f64> {
        let bs = engine.block_size();
        let mut output = Vec::new();
        let mut out = vec![0.0; bs];

        for block in signal.chunks(bs) {
            let mut padded = block.to_vec();
            padded.resize(bs, 0.0);
            engine.filter(&padded, &mut out).unwrap();
            output.extend_from_slice(&out);
        }
        for _ in 0..engine.tail_blocks() {
            engine.flush(&mut out).unwrap();
            output.extend_from_slice(&out);
        }
        output
    }

    #[test]
    fn test_impulse_is_shifted_kernel() {
        let kernel = [1.0, 2.0, 3.0];
        let mut engine = OverlapAdd::<f64>::new(&kernel, 4).unwrap();
        assert_eq!(engine.fft_size(), 8);
        assert_eq!(engine.tail_blocks(), 1);

        let mut signal = vec![0.0; 20];
        signal[5] = 1.0;
        let output = stream(&mut engine, &signal);
        assert_eq!(output.len(), 24);
        assert_eq!(engine.blocks_emitted(), 6);

        for (i, &v) in output.iter().enumerate() {
            let expected = match i {
                5 => 1.0,
                6 => 2.0,
                7 => 3.0,
                _ => 0.0,
            };
            assert!((v - expected).abs() < 1e-12, "sample {}: {}", i, v);
        }
    }

    #[test]
    fn test_matches_direct_convolution() {
        let signal = random_signal(500, 1);
        let kernel = random_signal(37, 2);
        let expected = direct_convolve(&signal, &kernel);

        for block_size in [1, 16, 64, 100, 512] {
            let mut engine = OverlapAdd::new(&kernel, block_size).unwrap();
            assert!(engine.fft_size() >= kernel.len() + block_size - 1);
            assert!(engine.fft_size().is_power_of_two());

            let output = stream(&mut engine, &signal);
            for (i, &e) in expected.iter().enumerate() {
                assert!(
                    (output[i] - e).abs() < 1e-10,
                    "block_size={} sample {}: {} vs {}",
                    block_size,
                    i,
                    output[i],
                    e
                );
            }
            // Anything past the linear convolution is zero
            assert!(output[expected.len()..].iter().all(|v| v.abs() < 1e-10));
        }
    }

    #[test]
    fn test_kernel_longer_than_block() {
        let signal = random_signal(300, 3);
        let kernel = random_signal(129, 4);
        let mut engine = OverlapAdd::new(&kernel, 32).unwrap();
        assert_eq!(engine.tail_blocks(), 4);

        let output = engine.convolve(&signal).unwrap();
        let expected = direct_convolve(&signal, &kernel);
        assert_eq!(output.len(), expected.len());
        for (o, e) in output.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-10);
        }
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            OverlapAdd::<f64>::new(&[], 16),
            Err(DspError::InvalidConfig(_))
        ));
        assert!(matches!(
            OverlapAdd::<f64>::new(&[1.0, 2.0], 0),
            Err(DspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_short_slices_rejected() {
        let mut engine = OverlapAdd::<f64>::new(&[1.0, 0.5], 8).unwrap();
        let mut out = vec![0.0; 8];

        let result = engine.filter(&[1.0; 7], &mut out);
        assert_eq!(result, Err(DspError::InsufficientData { needed: 8, got: 7 }));

        let mut short = vec![0.0; 4];
        assert!(engine.filter(&[1.0; 8], &mut short).is_err());
        assert!(engine.flush(&mut short).is_err());

        // Nothing was consumed by the failed calls
        assert_eq!(engine.blocks_emitted(), 0);
        engine.filter(&[1.0; 8], &mut out).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_longer_slices_use_prefix() {
        let mut engine = OverlapAdd::<f64>::new(&[1.0], 4).unwrap();
        let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut dst = vec![-1.0; 6];
        engine.filter(&src, &mut dst).unwrap();

        for i in 0..4 {
            assert!((dst[i] - src[i]).abs() < 1e-12);
        }
        assert_eq!(&dst[4..], &[-1.0, -1.0]);
    }

    #[test]
    fn test_initialize_allows_reuse() {
        let kernel = random_signal(20, 5);
        let first = random_signal(200, 6);
        let second = random_signal(200, 7);

        let mut engine = OverlapAdd::new(&kernel, 50).unwrap();
        let _ = stream(&mut engine, &first[..120]);
        engine.initialize();
        assert_eq!(engine.blocks_emitted(), 0);
        let reused = stream(&mut engine, &second);

        let mut fresh = OverlapAdd::new(&kernel, 50).unwrap();
        let expected = stream(&mut fresh, &second);

        for (r, e) in reused.iter().zip(expected.iter()) {
            assert!((r - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_slave_shares_transform() {
        let kernel_a = random_signal(15, 8);
        let kernel_b = random_signal(15, 9);
        let signal = random_signal(256, 10);

        let mut master = OverlapAdd::new(&kernel_a, 32).unwrap();
        let mut slave = OverlapAdd::slave(&kernel_b, &master).unwrap();
        assert!(!master.is_slave());
        assert!(slave.is_slave());
        assert_eq!(slave.block_size(), 32);
        assert_eq!(slave.fft_size(), master.fft_size());

        // Interleave calls on the shared transform
        let mut out_a = vec![0.0; 32];
        let mut out_b = vec![0.0; 32];
        let mut result_a = Vec::new();
        let mut result_b = Vec::new();
        for block in signal.chunks(32) {
            master.filter(block, &mut out_a).unwrap();
            slave.filter(block, &mut out_b).unwrap();
            result_a.extend_from_slice(&out_a);
            result_b.extend_from_slice(&out_b);
        }

        let mut independent = OverlapAdd::new(&kernel_b, 32).unwrap();
        let expected_b = stream(&mut independent, &signal);
        let expected_a = direct_convolve(&signal, &kernel_a);

        for i in 0..signal.len() {
            assert!((result_a[i] - expected_a[i]).abs() < 1e-10);
            assert!((result_b[i] - expected_b[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_slave_kernel_length_mismatch() {
        let master = OverlapAdd::<f64>::new(&[1.0; 10], 16).unwrap();
        let result = OverlapAdd::slave(&[1.0; 11], &master);
        assert!(matches!(
            result,
            Err(DspError::KernelLengthMismatch { master: 10, slave: 11 })
        ));
    }

    #[test]
    fn test_slave_after_master_dropped() {
        let master = OverlapAdd::<f64>::new(&[1.0, 2.0], 8).unwrap();
        let mut slave = OverlapAdd::slave(&[3.0, 4.0], &master).unwrap();

        let mut out = vec![0.0; 8];
        slave.filter(&[1.0; 8], &mut out).unwrap();

        drop(master);
        assert_eq!(slave.filter(&[1.0; 8], &mut out), Err(DspError::TransformReleased));

        // Draining carried state needs no transform
        slave.flush(&mut out).unwrap();
        assert!((out[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_filter_spectrum_matches_filter() {
        let kernel_a = random_signal(24, 11);
        let kernel_b = random_signal(24, 12);
        let signal = random_signal(192, 13);

        let mut bank_a = OverlapAdd::new(&kernel_a, 64).unwrap();
        let mut bank_b = OverlapAdd::slave(&kernel_b, &bank_a).unwrap();
        let mut direct_b = OverlapAdd::new(&kernel_b, 64).unwrap();

        let mut spectrum = bank_a.spectrum_buffer();
        let mut out_a = vec![0.0; 64];
        let mut out_b = vec![0.0; 64];
        let mut out_direct = vec![0.0; 64];

        for block in signal.chunks(64) {
            bank_a.transform_block(block, &mut spectrum).unwrap();
            bank_a.filter_spectrum(&spectrum, &mut out_a).unwrap();
            bank_b.filter_spectrum(&spectrum, &mut out_b).unwrap();
            direct_b.filter(block, &mut out_direct).unwrap();

            for i in 0..64 {
                assert!((out_b[i] - out_direct[i]).abs() < 1e-12);
            }
        }

        let wrong = BlockSpectrum::zeros(bank_a.fft_size() / 2);
        assert!(matches!(
            bank_a.filter_spectrum(&wrong, &mut out_a),
            Err(DspError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_single_precision() {
        let signal: Vec<f32> = random_signal(400, 14).into_iter().map(|v| v as f32).collect();
        let kernel: Vec<f32> = random_signal(31, 15).into_iter().map(|v| v as f32).collect();

        let mut engine = OverlapAdd::new(&kernel, 100).unwrap();
        let output = engine.convolve(&signal).unwrap();
        let expected = direct_convolve(&signal, &kernel);

        assert_eq!(output.len(), expected.len());
        for (o, e) in output.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-4, "{} vs {}", o, e);
        }
    }

    #[test]
    fn test_convolve_waveform() {
        let input = Waveform::new(vec![1.0; 100], Seconds(1e-3), Seconds(0.5));
        let mut engine = OverlapAdd::<f64>::new(&[0.25; 4], 32).unwrap();
        let output = engine.convolve_waveform(&input).unwrap();

        assert_eq!(output.len(), 103);
        assert_eq!(output.dt, input.dt);
        assert_eq!(output.t_start, input.t_start);
        assert!((output.samples[50] - 1.0).abs() < 1e-12);
        assert!((output.samples[0] - 0.25).abs() < 1e-12);

        assert!(engine.convolve(&[]).is_err());
    }

    #[test]
    fn test_direct_convolve_shift() {
        // Convolving with [0, 1] should shift by one sample
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let kernel = vec![0.0, 1.0];

        let result = direct_convolve(&signal, &kernel);
        assert_eq!(result, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(direct_convolve::<f64>(&[], &kernel).is_empty());
    }

    #[test]
    fn test_fft_convolve_matches_direct() {
        let signal: Vec<f64> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let kernel: Vec<f64> = vec![1.0, 0.5, 0.25];

        let direct = direct_convolve(&signal, &kernel);
        let fft = fft_convolve(&signal, &kernel).unwrap();
        assert_eq!(fft.len(), direct.len());

        for (d, f) in direct.iter().zip(fft.iter()) {
            assert!((d - f).abs() < 1e-10);
        }
    }
}
