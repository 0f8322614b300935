//! Physical units with type safety.
//!
//! Sample intervals and frequencies travel as newtypes so a sample rate is never
//! passed where a sample interval was expected.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul};

/// Time duration in seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f64);

impl Seconds {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn as_ms(&self) -> f64 {
        self.0 * 1e3
    }

    /// Convert to frequency (reciprocal).
    #[inline]
    pub fn to_frequency(&self) -> Hertz {
        Hertz(1.0 / self.0)
    }
}

impl Add for Seconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for Seconds {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Seconds {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// Frequency in Hertz.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hertz(pub f64);

impl Div<f64> for Hertz {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}
