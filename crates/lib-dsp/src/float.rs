//! Sample precision.
//!
//! Single and double precision transforms share one algorithm but are distinct
//! types: `Cdft<f32>` and `Cdft<f64>` never mix.

use num_traits::{Float, FloatConst, NumAssignOps};
use std::fmt::Debug;

/// Floating-point sample type accepted by the transform and filter engines.
pub trait DftFloat: Float + FloatConst + NumAssignOps + Default + Debug + Send + Sync + 'static {
    /// Convert a double precision constant.  Only used while building tables and kernels.
    fn cast(value: f64) -> Self;
}

impl DftFloat for f32 {
    #[inline]
    fn cast(value: f64) -> Self {
        value as f32
    }
}

impl DftFloat for f64 {
    #[inline]
    fn cast(value: f64) -> Self {
        value
    }
}
