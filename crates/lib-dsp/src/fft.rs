//! Complex DFT facade over the split-radix node tree.
//!
//! A [`Cdft`] is built once per transform size and reused for any number of
//! evaluations:
//! - Twiddle tables and the node tree are computed at construction
//! - Buffers are either bound once with [`Cdft::link`] and evaluated with
//!   [`Cdft::evaluate`], or passed per call to [`Cdft::forward`]
//! - Output is in natural order, bin 0 = DC through bin N-1
//!
//! ```
//! use lib_dsp::fft::{Cdft, Linkage};
//!
//! let mut dft = Cdft::<f64>::new(4).unwrap();
//! let mut linkage = Linkage::zeros(16);
//! linkage.source_re[0] = 1.0;
//! dft.link(linkage).unwrap();
//! dft.evaluate().unwrap();
//!
//! let linkage = dft.linkage().unwrap();
//! assert!(linkage.dest_re.iter().all(|&v| (v - 1.0).abs() < 1e-12));
//! ```

use crate::error::{DspError, DspResult};
use crate::float::DftFloat;
use crate::kernels::{Sink, Source};
use crate::split_radix::Node;
use crate::twiddle::TwiddleTable;
use num_complex::Complex;

/// Smallest supported transform order (size 8).
pub const MIN_LOG2_SIZE: u32 = 3;

/// Largest supported transform order (size 2^27).
pub const MAX_LOG2_SIZE: u32 = 27;

/// Buffers bound to a [`Cdft`].
///
/// For a forward evaluation the source pair holds the sequence and the
/// destination pair receives the transform.  For an inverse evaluation the
/// roles swap: the source pair holds the transform and the destination pair
/// receives the sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Linkage<T> {
    pub source_re: Vec<T>,
    pub source_im: Vec<T>,
    pub dest_re: Vec<T>,
    pub dest_im: Vec<T>,
}

impl<T: DftFloat> Linkage<T> {
    /// Zeroed buffers of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            source_re: vec![T::zero(); n],
            source_im: vec![T::zero(); n],
            dest_re: vec![T::zero(); n],
            dest_im: vec![T::zero(); n],
        }
    }

    /// Bind existing buffers.  All four must have the same length.
    pub fn new(source_re: Vec<T>, source_im: Vec<T>, dest_re: Vec<T>, dest_im: Vec<T>) -> DspResult<Self> {
        let n = source_re.len();
        for len in [source_im.len(), dest_re.len(), dest_im.len()] {
            expect_len(n, len)?;
        }
        Ok(Self {
            source_re,
            source_im,
            dest_re,
            dest_im,
        })
    }

    /// Common length of the four buffers.
    #[inline]
    pub fn len(&self) -> usize {
        self.source_re.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source_re.is_empty()
    }

    /// Copy new source data in.  `re` and `im` must match the buffer length.
    pub fn load(&mut self, re: &[T], im: &[T]) -> DspResult<()> {
        expect_len(self.len(), re.len())?;
        expect_len(self.len(), im.len())?;
        self.source_re.copy_from_slice(re);
        self.source_im.copy_from_slice(im);
        Ok(())
    }
}

/// Complex discrete Fourier transform of size `2^log2n`, split-radix algorithm.
///
/// The transform never reorders data in place, so input and output are always
/// separate buffers.  This trades memory for skipping the bit-reversal step.
#[derive(Clone, Debug)]
pub struct Cdft<T: DftFloat> {
    log2n: u32,
    n: usize,
    table: TwiddleTable<T>,
    root: Node,
    linkage: Option<Linkage<T>>,
}

impl<T: DftFloat> Cdft<T> {
    /// Create an unlinked transform of size `2^log2n`.
    ///
    /// Fails with [`DspError::InvalidTransformOrder`] unless
    /// `MIN_LOG2_SIZE <= log2n <= MAX_LOG2_SIZE`.
    pub fn new(log2n: u32) -> DspResult<Self> {
        if !(MIN_LOG2_SIZE..=MAX_LOG2_SIZE).contains(&log2n) {
            return Err(DspError::InvalidTransformOrder { log2n });
        }

        let n = 1usize << log2n;
        let table = TwiddleTable::new(n);
        let root = Node::build(log2n, 0, 1, 0, 1)?;

        tracing::debug!(
            "Cdft: size={}, log2n={}, table_len={}, nodes={}",
            root.size(),
            log2n,
            table.len(),
            root.node_count()
        );

        Ok(Self {
            log2n,
            n,
            table,
            root,
            linkage: None,
        })
    }

    /// Create a transform and link `linkage` immediately.
    pub fn with_linkage(linkage: Linkage<T>, log2n: u32) -> DspResult<Self> {
        let mut dft = Self::new(log2n)?;
        dft.link(linkage)?;
        Ok(dft)
    }

    /// Smallest transform whose size is at least `len` (and at least 8).
    pub fn with_min_size(len: usize) -> DspResult<Self> {
        match len.max(1 << MIN_LOG2_SIZE).checked_next_power_of_two() {
            Some(n) => Self::new(n.trailing_zeros()),
            None => Err(DspError::InvalidTransformOrder { log2n: usize::BITS }),
        }
    }

    /// Transform size N.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Base-2 logarithm of the transform size.
    #[inline]
    pub fn log2_size(&self) -> u32 {
        self.log2n
    }

    /// Bind buffers for [`evaluate`](Self::evaluate) and
    /// [`evaluate_inverse`](Self::evaluate_inverse), replacing any previous
    /// binding.  The buffers must be exactly N long.
    pub fn link(&mut self, linkage: Linkage<T>) -> DspResult<()> {
        expect_len(self.n, linkage.len())?;
        self.linkage = Some(linkage);
        Ok(())
    }

    /// Release the bound buffers, leaving the transform unlinked.
    pub fn unlink(&mut self) -> Option<Linkage<T>> {
        self.linkage.take()
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linkage.is_some()
    }

    pub fn linkage(&self) -> Option<&Linkage<T>> {
        self.linkage.as_ref()
    }

    /// Mutable access to the bound buffers, e.g. to load the next data set.
    pub fn linkage_mut(&mut self) -> Option<&mut Linkage<T>> {
        self.linkage.as_mut()
    }

    /// Forward transform of the linked source into the linked destination.
    pub fn evaluate(&mut self) -> DspResult<()> {
        let Self {
            table,
            root,
            linkage,
            ..
        } = self;
        let linkage = linkage.as_mut().ok_or(DspError::Unlinked)?;

        root.evaluate(
            table,
            &Source {
                re: &linkage.source_re,
                im: &linkage.source_im,
            },
            &mut Sink {
                re: &mut linkage.dest_re,
                im: &mut linkage.dest_im,
            },
        );
        Ok(())
    }

    /// Inverse transform of the linked source (a spectrum in natural order)
    /// into the linked destination, scaled by 1/N.
    pub fn evaluate_inverse(&mut self) -> DspResult<()> {
        self.evaluate()?;
        let n = self.n;
        let linkage = self.linkage.as_mut().ok_or(DspError::Unlinked)?;
        reorder_inverse(n, &mut linkage.dest_re, &mut linkage.dest_im);
        Ok(())
    }

    /// Forward transform with explicit buffers.
    ///
    /// Unlike [`Cdft::link`], this leaves the instance's linkage as it was (linked
    /// or not), so a shared `&Cdft` can serve many callers.
    pub fn forward(&self, xr: &[T], xi: &[T], yr: &mut [T], yi: &mut [T]) -> DspResult<()> {
        for len in [xr.len(), xi.len(), yr.len(), yi.len()] {
            expect_len(self.n, len)?;
        }

        self.root.evaluate(
            &self.table,
            &Source { re: xr, im: xi },
            &mut Sink { re: yr, im: yi },
        );
        Ok(())
    }

    /// Inverse transform with explicit buffers: `(xr, xi)` holds the spectrum,
    /// `(yr, yi)` receives the sequence.
    pub fn inverse(&self, xr: &[T], xi: &[T], yr: &mut [T], yi: &mut [T]) -> DspResult<()> {
        self.forward(xr, xi, yr, yi)?;
        reorder_inverse(self.n, yr, yi);
        Ok(())
    }

    /// Forward transform of complex samples, returning a new buffer.
    pub fn forward_complex(&self, input: &[Complex<T>]) -> DspResult<Vec<Complex<T>>> {
        let (xr, xi) = split(input);
        let mut yr = vec![T::zero(); self.n];
        let mut yi = vec![T::zero(); self.n];
        self.forward(&xr, &xi, &mut yr, &mut yi)?;
        Ok(join(&yr, &yi))
    }

    /// Inverse transform of a complex spectrum, returning a new buffer.
    pub fn inverse_complex(&self, spectrum: &[Complex<T>]) -> DspResult<Vec<Complex<T>>> {
        let (xr, xi) = split(spectrum);
        let mut yr = vec![T::zero(); self.n];
        let mut yi = vec![T::zero(); self.n];
        self.inverse(&xr, &xi, &mut yr, &mut yi)?;
        Ok(join(&yr, &yi))
    }
}

/// Turn a forward transform of a spectrum into its inverse transform:
/// `x[n] = (1/N) X'[(N - n) mod N]` where `X'` is the forward transform.
fn reorder_inverse<T: DftFloat>(n: usize, re: &mut [T], im: &mut [T]) {
    let scale = T::one() / T::cast(n as f64);
    let half = n / 2;

    re[0] *= scale;
    im[0] *= scale;
    re[half] *= scale;
    im[half] *= scale;

    let mut i = 1;
    let mut j = n - 1;
    while i < j {
        let tmp = re[i];
        re[i] = re[j] * scale;
        re[j] = tmp * scale;
        let tmp = im[i];
        im[i] = im[j] * scale;
        im[j] = tmp * scale;
        i += 1;
        j -= 1;
    }
}

/// Which product [`dft_product`] forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProductKind {
    /// `Y <- X * Y`, the spectrum of a circular convolution.
    #[default]
    Convolution,
    /// `Y <- conj(X) * Y`, the spectrum of a circular correlation.
    Correlation,
}

impl ProductKind {
    #[inline]
    fn sign<T: DftFloat>(self) -> T {
        match self {
            Self::Convolution => T::one(),
            Self::Correlation => -T::one(),
        }
    }
}

/// Multiply two spectra element by element, writing the product into `(yr, yi)`.
///
/// All four arrays must have the same length.
pub fn dft_product<T: DftFloat>(
    xr: &[T],
    xi: &[T],
    yr: &mut [T],
    yi: &mut [T],
    kind: ProductKind,
) -> DspResult<()> {
    let n = xr.len();
    for len in [xi.len(), yr.len(), yi.len()] {
        expect_len(n, len)?;
    }

    let sign: T = kind.sign();
    for i in 0..n {
        let re = xr[i] * yr[i] - sign * xi[i] * yi[i];
        yi[i] = xr[i] * yi[i] + sign * xi[i] * yr[i];
        yr[i] = re;
    }
    Ok(())
}

/// Magnitude spectrum of a real signal, bins 0 through N/2.
///
/// The signal is zero-padded to the next power of two (at least 8).
pub fn magnitude_spectrum(signal: &[f64]) -> DspResult<Vec<f64>> {
    if signal.is_empty() {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }

    let dft = Cdft::<f64>::with_min_size(signal.len())?;
    let n = dft.size();
    let xr = zero_pad(signal, n);
    let xi = vec![0.0; n];
    let mut yr = vec![0.0; n];
    let mut yi = vec![0.0; n];
    dft.forward(&xr, &xi, &mut yr, &mut yi)?;

    Ok(yr[..=n / 2]
        .iter()
        .zip(yi[..=n / 2].iter())
        .map(|(re, im)| re.hypot(*im))
        .collect())
}

/// Power spectrum (magnitude squared) of a real signal, bins 0 through N/2.
pub fn power_spectrum(signal: &[f64]) -> DspResult<Vec<f64>> {
    Ok(magnitude_spectrum(signal)?.into_iter().map(|m| m * m).collect())
}

/// Zero-pad a signal to a specific length.
pub fn zero_pad<T: DftFloat>(signal: &[T], new_len: usize) -> Vec<T> {
    let mut result = signal.to_vec();
    if new_len > signal.len() {
        result.resize(new_len, T::zero());
    }
    result
}

#[inline]
pub(crate) fn expect_len(expected: usize, actual: usize) -> DspResult<()> {
    if expected != actual {
        return Err(DspError::LengthMismatch { expected, actual });
    }
    Ok(())
}

fn split<T: DftFloat>(data: &[Complex<T>]) -> (Vec<T>, Vec<T>) {
    data.iter().map(|c| (c.re, c.im)).unzip()
}

fn join<T: DftFloat>(re: &[T], im: &[T]) -> Vec<Complex<T>> {
    re.iter().zip(im.iter()).map(|(&r, &i)| Complex::new(r, i)).collect()
}
