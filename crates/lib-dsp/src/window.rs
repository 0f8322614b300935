//! Windowing functions for spectral analysis and FIR design.
//!
//! All windows are symmetric: `w[i] == w[len - 1 - i]`.

use crate::error::DspError;
use crate::float::DftFloat;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowType {
    /// No windowing (rectangular window).
    #[default]
    Rectangular,

    /// Hann (raised cosine) window - good general purpose.
    Hann,

    /// Hamming window - slightly better sidelobe rejection than Hann.
    Hamming,

    /// Blackman window - excellent sidelobe rejection.
    Blackman,
}

impl WindowType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangular => "rectangular",
            Self::Hann => "hann",
            Self::Hamming => "hamming",
            Self::Blackman => "blackman",
        }
    }

    /// Window value at normalized position `x` in `[0, 1]`.
    fn value(&self, x: f64) -> f64 {
        match self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5 * (1.0 - (2.0 * PI * x).cos()),
            Self::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
            Self::Blackman => 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos(),
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(Self::Rectangular),
            "hann" | "hanning" => Ok(Self::Hann),
            "hamming" => Ok(Self::Hamming),
            "blackman" => Ok(Self::Blackman),
            other => Err(DspError::InvalidConfig(format!("unknown window type '{}'", other))),
        }
    }
}

/// Generate window coefficients for a given window type and length.
///
/// Coefficients are evaluated in double precision and cast to `T`.
pub fn generate_window<T: DftFloat>(window_type: WindowType, length: usize) -> Vec<T> {
    match length {
        0 => Vec::new(),
        1 => vec![T::one()],
        _ => {
            let span = (length - 1) as f64;
            (0..length)
                .map(|i| T::cast(window_type.value(i as f64 / span)))
                .collect()
        }
    }
}

/// Multiply `signal` in place by a window of the same length.
pub fn apply_window<T: DftFloat>(signal: &mut [T], window_type: WindowType) {
    if window_type == WindowType::Rectangular {
        return;
    }

    let window: Vec<T> = generate_window(window_type, signal.len());
    for (s, w) in signal.iter_mut().zip(window) {
        *s *= w;
    }
}
