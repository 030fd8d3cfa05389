//! Image quality metrics.
//!
//! PSNR: `20 * log10(peak / sqrt(mse))`, in decibels. Identical inputs
//! have zero error and an infinite PSNR.

use crate::{OpsError, OpsResult};
use tracing::trace;
use vsr_core::Tensor;

/// Peak value of 8-bit samples.
pub const PEAK_8BIT: f64 = 255.0;

/// Mean squared error between two equally shaped tensors.
pub fn mse(a: &Tensor, b: &Tensor) -> OpsResult<f64> {
    if a.shape() != b.shape() {
        return Err(OpsError::shapes(a.shape(), b.shape()));
    }
    if a.is_empty() {
        return Err(OpsError::InvalidDimensions("cannot compare empty arrays".into()));
    }
    let sum: f64 = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    Ok(sum / a.len() as f64)
}

/// PSNR for samples with the given peak value.
pub fn psnr_with_peak(a: &Tensor, b: &Tensor, peak: f64) -> OpsResult<f64> {
    let mse = mse(a, b)?;
    trace!(mse, peak, "psnr");
    Ok(20.0 * (peak / mse.sqrt()).log10())
}

/// PSNR for 8-bit range samples.
///
/// # Example
///
/// ```rust
/// use vsr_core::Tensor;
/// use vsr_ops::metrics::psnr;
///
/// let a = Tensor::new(vec![4], vec![0.0; 4]).unwrap();
/// let b = Tensor::new(vec![4], vec![255.0; 4]).unwrap();
/// assert_eq!(psnr(&a, &b).unwrap(), 0.0);
/// ```
pub fn psnr(a: &Tensor, b: &Tensor) -> OpsResult<f64> {
    psnr_with_peak(a, b, PEAK_8BIT)
}
