//! Error types for vsr-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of tensor construction,
//! shape manipulation and frame conversion.
//!
//! ```rust
//! use vsr_core::{Error, Result};
//!
//! fn check(len: usize, expected: usize) -> Result<()> {
//!     if len != expected {
//!         return Err(Error::buffer_size(expected, len));
//!     }
//!     Ok(())
//! }
//! assert!(check(3, 4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by tensor and frame operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Data length does not match the product of the shape.
    #[error("buffer size mismatch: shape needs {expected} elements, got {got}")]
    BufferSize {
        /// Elements required by the shape
        expected: usize,
        /// Elements supplied
        got: usize,
    },

    /// Two shapes that must agree do not.
    #[error("shape mismatch: {a:?} vs {b:?}")]
    ShapeMismatch {
        /// First shape
        a: Vec<usize>,
        /// Second shape
        b: Vec<usize>,
    },

    /// Axis index outside the tensor rank.
    #[error("axis {axis} out of range for rank {rank}")]
    AxisOutOfRange {
        /// Requested axis
        axis: usize,
        /// Tensor rank
        rank: usize,
    },

    /// Index outside an axis.
    #[error("index {index} out of range for axis of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Axis length
        len: usize,
    },

    /// Array cannot be interpreted as an image.
    #[error("invalid image data: {0}")]
    InvalidImage(String),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::BufferSize`] error.
    #[inline]
    pub fn buffer_size(expected: usize, got: usize) -> Self {
        Self::BufferSize { expected, got }
    }

    /// Creates an [`Error::ShapeMismatch`] error.
    #[inline]
    pub fn shape_mismatch(a: &[usize], b: &[usize]) -> Self {
        Self::ShapeMismatch {
            a: a.to_vec(),
            b: b.to_vec(),
        }
    }

    /// Creates an [`Error::InvalidImage`] error.
    #[inline]
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = Error::shape_mismatch(&[2, 3], &[3, 2]);
        let msg = err.to_string();
        assert!(msg.contains("[2, 3]"));
        assert!(msg.contains("[3, 2]"));
    }

    #[test]
    fn test_invalid_image_message() {
        let err = Error::invalid_image("rank 5");
        assert!(err.to_string().contains("rank 5"));
    }
}
