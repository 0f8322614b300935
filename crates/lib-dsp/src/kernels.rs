//! Hand-unrolled length-8 and length-16 DFT kernels.
//!
//! These are the leaves of the split-radix recursion.  Each kernel reads its
//! input through precomputed sequence indices (offset + j * stride) and writes a
//! contiguous run of transform values starting at its transform offset.  The
//! twiddles are closed-form constants (`√2/2`, `cos π/8`, `sin π/8`) rather
//! than table lookups.

use crate::float::DftFloat;

/// Borrowed view of the sequence (input) arrays for one evaluation.
pub(crate) struct Source<'a, T> {
    pub re: &'a [T],
    pub im: &'a [T],
}

/// Borrowed view of the transform (output) arrays for one evaluation.
pub(crate) struct Sink<'a, T> {
    pub re: &'a mut [T],
    pub im: &'a mut [T],
}

/// Multiply `z` by the twiddle `w`.
#[inline(always)]
pub(crate) fn rotate<T: DftFloat>(wr: T, wi: T, zr: T, zi: T) -> (T, T) {
    (wr * zr - wi * zi, wr * zi + wi * zr)
}

/// Split-radix butterfly for one frequency index `k`.
///
/// On entry `a` and `b` hold the half-size transform at `k` and `k + n/4`; `t1`
/// and `t3` are the twiddled quarter-size transforms `W^k Z[k]` and
/// `W^3k Z'[k]`.  With `R = t1 + t3` and `S = i (t1 - t3)`:
///
/// ```text
/// X[k]        = U[k]       + R   -> a
/// X[k + n/4]  = U[k + n/4] - S   -> b
/// X[k + n/2]  = U[k]       - R   -> c
/// X[k + 3n/4] = U[k + n/4] + S   -> d
/// ```
#[inline(always)]
pub(crate) fn butterfly<T: DftFloat>(
    y: &mut Sink<'_, T>,
    a: usize,
    b: usize,
    c: usize,
    d: usize,
    t1: (T, T),
    t3: (T, T),
) {
    let rr = t1.0 + t3.0;
    let ri = t1.1 + t3.1;
    let sr = t3.1 - t1.1;
    let si = t1.0 - t3.0;

    y.re[c] = y.re[a] - rr;
    y.im[c] = y.im[a] - ri;
    y.re[d] = y.re[b] + sr;
    y.im[d] = y.im[b] + si;

    y.re[a] += rr;
    y.im[a] += ri;
    y.re[b] -= sr;
    y.im[b] -= si;
}

/// Length-4 DFT of `x[p]` into `y[q]`.
#[inline(always)]
fn dft4<T: DftFloat>(x: &Source<'_, T>, y: &mut Sink<'_, T>, p: &[usize; 4], q: &[usize; 4]) {
    let [p0, p1, p2, p3] = *p;
    let [q0, q1, q2, q3] = *q;

    y.re[q0] = x.re[p0] + x.re[p2];
    y.im[q0] = x.im[p0] + x.im[p2];
    y.re[q1] = x.re[p0] - x.re[p2];
    y.im[q1] = x.im[p0] - x.im[p2];

    butterfly(y, q0, q1, q2, q3, (x.re[p1], x.im[p1]), (x.re[p3], x.im[p3]));
}

/// Length-8 DFT of `x[n]` into `y[m]`.
#[inline(always)]
fn dft8<T: DftFloat>(x: &Source<'_, T>, y: &mut Sink<'_, T>, n: &[usize; 8], m: &[usize; 8]) {
    let h = T::FRAC_1_SQRT_2();
    let [n0, n1, n2, n3, n4, n5, n6, n7] = *n;
    let [m0, m1, m2, m3, m4, m5, m6, m7] = *m;

    // length 2 on x0, x4
    y.re[m0] = x.re[n0] + x.re[n4];
    y.im[m0] = x.im[n0] + x.im[n4];
    y.re[m1] = x.re[n0] - x.re[n4];
    y.im[m1] = x.im[n0] - x.im[n4];

    // length 4 on the even samples, k = 0
    butterfly(y, m0, m1, m2, m3, (x.re[n2], x.im[n2]), (x.re[n6], x.im[n6]));

    // length 2 on x1, x5
    y.re[m4] = x.re[n1] + x.re[n5];
    y.im[m4] = x.im[n1] + x.im[n5];
    y.re[m5] = x.re[n1] - x.re[n5];
    y.im[m5] = x.im[n1] - x.im[n5];

    // length 2 on x3, x7
    y.re[m6] = x.re[n3] + x.re[n7];
    y.im[m6] = x.im[n3] + x.im[n7];
    y.re[m7] = x.re[n3] - x.re[n7];
    y.im[m7] = x.im[n3] - x.im[n7];

    // length 8, k = 0
    let t1 = (y.re[m4], y.im[m4]);
    let t3 = (y.re[m6], y.im[m6]);
    butterfly(y, m0, m2, m4, m6, t1, t3);

    // k = 1: W = √2/2 (1 - i), W^3 = √2/2 (-1 - i)
    let t1 = (h * (y.re[m5] + y.im[m5]), h * (y.im[m5] - y.re[m5]));
    let t3 = (h * (y.im[m7] - y.re[m7]), -h * (y.im[m7] + y.re[m7]));
    butterfly(y, m1, m3, m5, m7, t1, t3);
}

/// Leaf node computing a length-8 transform.
#[derive(Clone, Debug)]
pub(crate) struct Base8 {
    n: [usize; 8],
    m: [usize; 8],
}

impl Base8 {
    pub(crate) fn new(x_offset: usize, x_stride: usize, y_offset: usize) -> Self {
        Self {
            n: std::array::from_fn(|j| x_offset + j * x_stride),
            m: std::array::from_fn(|j| y_offset + j),
        }
    }

    #[inline]
    pub(crate) fn evaluate<T: DftFloat>(&self, x: &Source<'_, T>, y: &mut Sink<'_, T>) {
        dft8(x, y, &self.n, &self.m);
    }
}

/// cos(π/8)
const COS_PI_8: f64 = 0.923_879_532_511_286_7;
/// sin(π/8)
const SIN_PI_8: f64 = 0.382_683_432_365_089_8;

/// Leaf node computing a length-16 transform.
///
/// One length-8 kernel on the even samples, two length-4 kernels on the odd
/// subsequences `x[4j + 1]` and `x[4j + 3]`, then four unrolled butterflies.
#[derive(Clone, Debug)]
pub(crate) struct Base16 {
    n_even: [usize; 8],
    n_odd1: [usize; 4],
    n_odd3: [usize; 4],
    m_half: [usize; 8],
    m_odd1: [usize; 4],
    m_odd3: [usize; 4],
}

impl Base16 {
    pub(crate) fn new(x_offset: usize, x_stride: usize, y_offset: usize) -> Self {
        Self {
            n_even: std::array::from_fn(|j| x_offset + 2 * j * x_stride),
            n_odd1: std::array::from_fn(|j| x_offset + (4 * j + 1) * x_stride),
            n_odd3: std::array::from_fn(|j| x_offset + (4 * j + 3) * x_stride),
            m_half: std::array::from_fn(|j| y_offset + j),
            m_odd1: std::array::from_fn(|j| y_offset + 8 + j),
            m_odd3: std::array::from_fn(|j| y_offset + 12 + j),
        }
    }

    pub(crate) fn evaluate<T: DftFloat>(&self, x: &Source<'_, T>, y: &mut Sink<'_, T>) {
        let h = T::FRAC_1_SQRT_2();
        let c1 = T::cast(COS_PI_8);
        let s1 = T::cast(SIN_PI_8);

        dft8(x, y, &self.n_even, &self.m_half);
        dft4(x, y, &self.n_odd1, &self.m_odd1);
        dft4(x, y, &self.n_odd3, &self.m_odd3);

        let u = &self.m_half;
        let z = &self.m_odd1;
        let w = &self.m_odd3;

        // k = 0
        let t1 = (y.re[z[0]], y.im[z[0]]);
        let t3 = (y.re[w[0]], y.im[w[0]]);
        butterfly(y, u[0], u[4], z[0], w[0], t1, t3);

        // k = 1: W = cos π/8 - i sin π/8, W^3 = sin π/8 - i cos π/8
        let t1 = rotate(c1, -s1, y.re[z[1]], y.im[z[1]]);
        let t3 = rotate(s1, -c1, y.re[w[1]], y.im[w[1]]);
        butterfly(y, u[1], u[5], z[1], w[1], t1, t3);

        // k = 2: W^2 = √2/2 (1 - i), W^6 = √2/2 (-1 - i)
        let t1 = (h * (y.re[z[2]] + y.im[z[2]]), h * (y.im[z[2]] - y.re[z[2]]));
        let t3 = (h * (y.im[w[2]] - y.re[w[2]]), -h * (y.im[w[2]] + y.re[w[2]]));
        butterfly(y, u[2], u[6], z[2], w[2], t1, t3);

        // k = 3: W^3 = sin π/8 - i cos π/8, W^9 = -cos π/8 + i sin π/8
        let t1 = rotate(s1, -c1, y.re[z[3]], y.im[z[3]]);
        let t3 = rotate(-c1, s1, y.re[w[3]], y.im[w[3]]);
        butterfly(y, u[3], u[7], z[3], w[3], t1, t3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn naive_dft(xr: &[f64], xi: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = xr.len();
        let mut yr = vec![0.0; n];
        let mut yi = vec![0.0; n];
        for k in 0..n {
            for j in 0..n {
                let theta = 2.0 * PI * (j * k % n) as f64 / n as f64;
                yr[k] += xr[j] * theta.cos() + xi[j] * theta.sin();
                yi[k] += xi[j] * theta.cos() - xr[j] * theta.sin();
            }
        }
        (yr, yi)
    }

    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
        let xr = (0..n).map(|i| (i as f64 * 0.7).sin() + 0.1 * i as f64).collect();
        let xi = (0..n).map(|i| (i as f64 * 1.3).cos() - 0.05 * i as f64).collect();
        (xr, xi)
    }

    #[test]
    fn test_base8_matches_definition() {
        let (xr, xi) = ramp(8);
        let mut yr = vec![0.0; 8];
        let mut yi = vec![0.0; 8];

        let kernel = Base8::new(0, 1, 0);
        kernel.evaluate(&Source { re: &xr, im: &xi }, &mut Sink { re: &mut yr, im: &mut yi });

        let (er, ei) = naive_dft(&xr, &xi);
        for k in 0..8 {
            assert!((yr[k] - er[k]).abs() < 1e-12, "re mismatch at bin {}", k);
            assert!((yi[k] - ei[k]).abs() < 1e-12, "im mismatch at bin {}", k);
        }
    }

    #[test]
    fn test_base16_matches_definition() {
        let (xr, xi) = ramp(16);
        let mut yr = vec![0.0; 16];
        let mut yi = vec![0.0; 16];

        let kernel = Base16::new(0, 1, 0);
        kernel.evaluate(&Source { re: &xr, im: &xi }, &mut Sink { re: &mut yr, im: &mut yi });

        let (er, ei) = naive_dft(&xr, &xi);
        for k in 0..16 {
            assert!((yr[k] - er[k]).abs() < 1e-12, "re mismatch at bin {}", k);
            assert!((yi[k] - ei[k]).abs() < 1e-12, "im mismatch at bin {}", k);
        }
    }

    #[test]
    fn test_eighth_turn_constants() {
        let theta = std::f64::consts::FRAC_PI_8;
        assert!((COS_PI_8 - theta.cos()).abs() < 1e-15);
        assert!((SIN_PI_8 - theta.sin()).abs() < 1e-15);
    }

    #[test]
    fn test_strided_addressing() {
        // Every third sample starting at 2, written at transform offset 5.
        let (sr, si) = ramp(8);
        let mut xr = vec![99.0; 2 + 3 * 8];
        let mut xi = vec![-99.0; 2 + 3 * 8];
        for j in 0..8 {
            xr[2 + 3 * j] = sr[j];
            xi[2 + 3 * j] = si[j];
        }
        let mut yr = vec![0.0; 13];
        let mut yi = vec![0.0; 13];

        let kernel = Base8::new(2, 3, 5);
        kernel.evaluate(&Source { re: &xr, im: &xi }, &mut Sink { re: &mut yr, im: &mut yi });

        let (er, ei) = naive_dft(&sr, &si);
        assert!(yr[..5].iter().all(|&v| v == 0.0));
        for k in 0..8 {
            assert!((yr[5 + k] - er[k]).abs() < 1e-12);
            assert!((yi[5 + k] - ei[k]).abs() < 1e-12);
        }
    }
}
