//! Residual subtraction.
//!
//! Networks that predict a residual are evaluated against the input minus
//! that residual.

use crate::{OpsError, OpsResult};
use tracing::trace;
use vsr_core::Tensor;

/// Returns `input - residual`. Without a residual `input` comes back
/// unchanged, dtype included.
///
/// # Example
///
/// ```rust
/// use vsr_core::Tensor;
/// use vsr_ops::residual::subtract_residual;
///
/// let input = Tensor::new(vec![2], vec![5.0, 7.0]).unwrap();
/// let res = Tensor::new(vec![2], vec![1.0, 2.0]).unwrap();
/// assert_eq!(subtract_residual(&input, Some(&res)).unwrap().data(), &[4.0, 5.0]);
/// ```
pub fn subtract_residual(input: &Tensor, residual: Option<&Tensor>) -> OpsResult<Tensor> {
    trace!(shape = ?input.shape(), has_residual = residual.is_some(), "subtract_residual");
    match residual {
        None => Ok(input.clone()),
        Some(res) => input
            .zip_map(res, |a, b| a - b)
            .map_err(|_| OpsError::shapes(input.shape(), res.shape())),
    }
}
