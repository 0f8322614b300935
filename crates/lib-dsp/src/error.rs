//! Error types for DSP operations.

use thiserror::Error;

/// Errors that can occur during DSP operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DspError {
    /// Transform order outside the supported range `3..=27`.
    #[error("DFT size must be a power of two from 8 to 2^27, got log2n = {log2n}")]
    InvalidTransformOrder { log2n: u32 },

    /// Array length mismatch.
    #[error("Input length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Insufficient data for operation.
    #[error("Insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Evaluation requested before buffers were linked.
    #[error("Sequence and transform arrays are not linked")]
    Unlinked,

    /// A slave filter kernel must match its master's kernel length.
    #[error("Slave kernel length {slave} inconsistent with master kernel length {master}")]
    KernelLengthMismatch { master: usize, slave: usize },

    /// The shared transform was dropped together with its master.
    #[error("Shared transform released: master filter no longer alive")]
    TransformReleased,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
