//! Uniformly sampled time series.
//!
//! Sample `i` of a [`Waveform`] is a point measurement taken at
//!
//! ```text
//! t[i] = t_start + i * dt
//! ```
//!
//! Filtering keeps `dt` and `t_start`; the filtered series simply grows by the
//! length of the kernel tail.

use crate::units::{Hertz, Seconds};
use serde::{Deserialize, Serialize};

/// A uniformly-sampled time series (seismogram trace, acoustic channel, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    /// Sample values.
    pub samples: Vec<f64>,

    /// Sample interval.
    pub dt: Seconds,

    /// Time of the first sample.
    pub t_start: Seconds,
}

impl Waveform {
    /// Create a new waveform from samples.
    pub fn new(samples: Vec<f64>, dt: Seconds, t_start: Seconds) -> Self {
        Self { samples, dt, t_start }
    }

    /// Number of samples in the waveform.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the waveform is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate (reciprocal of dt).
    #[inline]
    pub fn sample_rate(&self) -> Hertz {
        self.dt.to_frequency()
    }

    /// Half the sample rate.
    #[inline]
    pub fn nyquist(&self) -> Hertz {
        self.sample_rate() / 2.0
    }

    /// Maximum absolute value.
    pub fn max_abs(&self) -> f64 {
        self.samples.iter().map(|v| v.abs()).fold(0.0, f64::max)
    }

    /// Root mean square value.
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.samples.iter().map(|v| v * v).sum();
        (sum_sq / self.samples.len() as f64).sqrt()
    }

    /// Remove the mean so a DC offset does not dominate bin 0.
    pub fn demean(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        for sample in &mut self.samples {
            *sample -= mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let wf = Waveform::new(vec![0.0; 5], Seconds(0.01), Seconds(2.0));
        assert!((wf.sample_rate().0 - 100.0).abs() < 1e-9);
        assert!((wf.nyquist().0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rms_and_peak() {
        let wf = Waveform::new(vec![1.0, -1.0, 1.0, -1.0], Seconds(1.0), Seconds::ZERO);
        assert!((wf.rms() - 1.0).abs() < 1e-12);
        assert_eq!(wf.max_abs(), 1.0);
        assert_eq!(Waveform::new(Vec::new(), Seconds(1.0), Seconds::ZERO).rms(), 0.0);
    }

    #[test]
    fn test_demean() {
        let mut wf = Waveform::new(vec![3.0, 5.0, 7.0], Seconds(1.0), Seconds::ZERO);
        wf.demean();
        assert_eq!(wf.samples, vec![-2.0, 0.0, 2.0]);
    }
}
