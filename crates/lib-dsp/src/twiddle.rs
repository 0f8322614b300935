//! Twiddle factor tables for the split-radix recursion.

use crate::float::DftFloat;
use std::f64::consts::PI;

/// Cosine/sine tables for a length-`n` transform.
///
/// Entry `i` of each table, for `i < n / 8`:
///
/// ```text
/// c[i]  =  cos(2πi/n)     c3[i] =  cos(6πi/n)
/// s[i]  = -sin(2πi/n)     s3[i] = -sin(6πi/n)
/// ```
///
/// Sub-transforms of size `m` read the same tables at stride `n / m`.  The
/// remaining twiddles up to a quarter turn follow from symmetry, so eighth-length
/// tables are enough.
#[derive(Clone, Debug)]
pub struct TwiddleTable<T> {
    pub(crate) c: Vec<T>,
    pub(crate) c3: Vec<T>,
    pub(crate) s: Vec<T>,
    pub(crate) s3: Vec<T>,
}

impl<T: DftFloat> TwiddleTable<T> {
    /// Build the tables for a transform of size `n` (a power of two, at least 8).
    ///
    /// Values are computed in double precision and rounded once to `T`.
    pub fn new(n: usize) -> Self {
        let n8 = n / 8;
        let mut c = Vec::with_capacity(n8);
        let mut c3 = Vec::with_capacity(n8);
        let mut s = Vec::with_capacity(n8);
        let mut s3 = Vec::with_capacity(n8);

        for i in 0..n8 {
            let theta = 2.0 * PI * i as f64 / n as f64;
            c.push(T::cast(theta.cos()));
            c3.push(T::cast((3.0 * theta).cos()));
            s.push(T::cast(-theta.sin()));
            s3.push(T::cast(-(3.0 * theta).sin()));
        }

        Self { c, c3, s, s3 }
    }

    /// Number of entries in each table.
    #[inline]
    pub fn len(&self) -> usize {
        self.c.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }
}
