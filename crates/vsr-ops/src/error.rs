//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Arrays have incompatible shapes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Tensor or frame construction failed.
    #[error(transparent)]
    Core(#[from] vsr_core::Error),
}

impl OpsError {
    /// Builds a [`OpsError::SizeMismatch`] from two shapes.
    pub(crate) fn shapes(a: &[usize], b: &[usize]) -> Self {
        OpsError::SizeMismatch(format!("{:?} vs {:?}", a, b))
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
