//! Error types for callback construction and invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for callback operations.
pub type TrainResult<T> = Result<T, TrainError>;

/// Errors raised while building or running callbacks.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Unknown method name or out-of-domain parameter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A hook needed a named argument the harness did not supply.
    #[error("missing hook argument: {0}")]
    MissingArgument(&'static str),

    /// Pixel operation failed.
    #[error(transparent)]
    Ops(#[from] vsr_ops::OpsError),

    /// Image I/O failed.
    #[error(transparent)]
    Io(#[from] vsr_io::IoError),

    /// Tensor manipulation failed.
    #[error(transparent)]
    Core(#[from] vsr_core::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl TrainError {
    /// Creates an [`TrainError::InvalidArgument`] error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
