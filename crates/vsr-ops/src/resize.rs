//! Separable bicubic resampling.
//!
//! Used to bring chroma planes up to the resolution of a predicted luma
//! plane. The kernel is Keys cubic convolution with `a = -0.5`.
//!
//! # Example
//!
//! ```rust
//! use vsr_ops::resize::resize_f32;
//!
//! let src = vec![0.5f32; 16 * 16 * 3];
//! let dst = resize_f32(&src, 16, 16, 3, 32, 32).unwrap();
//! assert_eq!(dst.len(), 32 * 32 * 3);
//! ```

use crate::{OpsError, OpsResult};
use tracing::trace;

/// Kernel support radius.
const SUPPORT: f32 = 2.0;

/// Keys cubic convolution.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    const A: f32 = -0.5;

    let ax = x.abs();
    if ax < 1.0 {
        ((A + 2.0) * ax - (A + 3.0)) * ax * ax + 1.0
    } else if ax < 2.0 {
        (((ax - 5.0) * ax + 8.0) * ax - 4.0) * A
    } else {
        0.0
    }
}

/// Resizes interleaved f32 image data.
///
/// # Arguments
///
/// * `src` - Source pixel data
/// * `src_w`, `src_h` - Source size
/// * `channels` - Interleaved channel count
/// * `dst_w`, `dst_h` - Destination size
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> OpsResult<Vec<f32>> {
    trace!(src_w, src_h, channels, dst_w, dst_h, "resize_f32");

    let expected = src_w * src_h * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if src_w == 0 || src_h == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions("source size must be > 0".into()));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }

    // Horizontal then vertical
    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w);
    Ok(resize_vertical(&temp, dst_w, src_h, channels, dst_h))
}

/// Scales an image by integer factors `(fy, fx)`.
///
/// # Example
///
/// ```rust
/// use vsr_ops::resize::rescale;
///
/// let src = vec![1.0f32; 4 * 4];
/// let (dst, w, h) = rescale(&src, 4, 4, 1, (2, 3)).unwrap();
/// assert_eq!((w, h), (12, 8));
/// assert_eq!(dst.len(), 12 * 8);
/// ```
pub fn rescale(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    (fy, fx): (usize, usize),
) -> OpsResult<(Vec<f32>, usize, usize)> {
    if fy == 0 || fx == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "scale factors must be > 0, got ({}, {})",
            fy, fx
        )));
    }
    let (dst_w, dst_h) = (width * fx, height * fy);
    let dst = resize_f32(src, width, height, channels, dst_w, dst_h)?;
    Ok((dst, dst_w, dst_h))
}

/// Source taps and normalized weights for one destination coordinate.
fn taps(dst: usize, src_len: usize, scale: f32) -> (usize, Vec<f32>) {
    let filter_scale = scale.max(1.0);
    let support = SUPPORT * filter_scale;
    let center = (dst as f32 + 0.5) * scale - 0.5;
    let lo = ((center - support).floor() as isize).max(0) as usize;
    let hi = ((center + support).ceil() as isize).clamp(0, src_len as isize - 1) as usize;

    let mut weights: Vec<f32> = (lo..=hi)
        .map(|s| bicubic_weight((s as f32 - center) / filter_scale))
        .collect();
    let sum: f32 = weights.iter().sum();
    if sum != 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }
    (lo, weights)
}

fn resize_horizontal(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * channels];
    let scale = src_w as f32 / dst_w as f32;
    let columns: Vec<_> = (0..dst_w).map(|x| taps(x, src_w, scale)).collect();

    for y in 0..src_h {
        for (x, (lo, weights)) in columns.iter().enumerate() {
            let dst_idx = (y * dst_w + x) * channels;
            for (k, w) in weights.iter().enumerate() {
                let src_idx = (y * src_w + lo + k) * channels;
                for c in 0..channels {
                    dst[dst_idx + c] += src[src_idx + c] * w;
                }
            }
        }
    }

    dst
}

fn resize_vertical(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * channels];
    let scale = src_h as f32 / dst_h as f32;

    for y in 0..dst_h {
        let (lo, weights) = taps(y, src_h, scale);
        for x in 0..src_w {
            let dst_idx = (y * src_w + x) * channels;
            for (k, w) in weights.iter().enumerate() {
                let src_idx = ((lo + k) * src_w + x) * channels;
                for c in 0..channels {
                    dst[dst_idx + c] += src[src_idx + c] * w;
                }
            }
        }
    }

    dst
}
