//! Gaussian spatial filtering.
//!
//! The filter is separable: a normalized 1-D kernel is run along rows and
//! then along columns. Pixels outside the image read as zero (constant
//! boundary), so a blurred border darkens toward the edge.
//!
//! The kernel radius follows the truncation convention
//! `radius = floor(truncate * sigma + 0.5)`.
//!
//! # Example
//!
//! ```rust
//! use vsr_ops::filter::{gaussian_filter, gaussian_kernel1d};
//!
//! let k = gaussian_kernel1d(1.0, 2);
//! assert_eq!(k.len(), 5);
//!
//! let src = vec![0.5f32; 16 * 16];
//! let out = gaussian_filter(&src, 16, 16, 1.0, 4.0).unwrap();
//! assert_eq!(out.len(), src.len());
//! ```

use crate::{OpsError, OpsResult};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};
use vsr_core::{DType, Tensor};

/// Sigmas at or below this leave an axis untouched.
const MIN_SIGMA: f32 = 1e-15;

/// Kernel radius for a given `sigma` and `truncate` (in standard deviations).
#[inline]
pub fn kernel_radius(sigma: f32, truncate: f32) -> usize {
    (truncate * sigma + 0.5).max(0.0) as usize
}

/// Normalized 1-D Gaussian kernel of length `2 * radius + 1`.
pub fn gaussian_kernel1d(sigma: f32, radius: usize) -> Vec<f32> {
    let r = radius as isize;
    let inv = -0.5 / (sigma * sigma);
    let mut k: Vec<f32> = (-r..=r).map(|x| (inv * (x * x) as f32).exp()).collect();
    let sum: f32 = k.iter().sum();
    for w in &mut k {
        *w /= sum;
    }
    k
}

/// Filters a single `width x height` plane.
///
/// # Arguments
///
/// * `src` - Plane samples, row-major
/// * `sigma` - Standard deviation in pixels
/// * `truncate` - Kernel half-width in standard deviations
pub fn gaussian_filter(
    src: &[f32],
    width: usize,
    height: usize,
    sigma: f32,
    truncate: f32,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, sigma, truncate, "gaussian_filter");

    if src.len() != width * height {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            width * height,
            src.len()
        )));
    }
    if sigma <= MIN_SIGMA {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel1d(sigma, kernel_radius(sigma, truncate));
    let temp = correlate_rows(src, width, height, &kernel);
    Ok(correlate_columns(&temp, width, height, &kernel))
}

fn correlate_rows(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let r = (kernel.len() / 2) as isize;
    let mut dst = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - r;
                if sx >= 0 && (sx as usize) < width {
                    sum += row[sx as usize] * w;
                }
            }
            dst[y * width + x] = sum;
        }
    }
    dst
}

fn correlate_columns(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let r = (kernel.len() / 2) as isize;
    let mut dst = vec![0.0f32; width * height];
    for y in 0..height {
        for (k, w) in kernel.iter().enumerate() {
            let sy = y as isize + k as isize - r;
            if sy < 0 || sy as usize >= height {
                continue;
            }
            let src_row = &src[sy as usize * width..(sy as usize + 1) * width];
            let dst_row = &mut dst[y * width..(y + 1) * width];
            for (d, s) in dst_row.iter_mut().zip(src_row) {
                *d += s * w;
            }
        }
    }
    dst
}

/// Blurs every channel of every batch item independently.
///
/// Accepts `[N, H, W, C]` or `[H, W, C]`; the output keeps the input shape
/// and is [`DType::F32`]. `kernel_size` fixes the kernel half-width at
/// `kernel_size / 2` pixels, i.e. `truncate = (kernel_size / 2) / sigma`.
pub fn gaussian_blur(src: &Tensor, sigma: f32, kernel_size: usize) -> OpsResult<Tensor> {
    let (n, h, w, c) = src.as_nhwc()?;
    debug!(n, h, w, c, sigma, kernel_size, "gaussian blur");

    if sigma <= MIN_SIGMA {
        return Ok(src.clone().with_dtype(DType::F32));
    }
    let truncate = (kernel_size / 2) as f32 / sigma;
    let item_len = h * w * c;
    let data = src.data();

    let blur_item = |item: &[f32]| -> OpsResult<Vec<f32>> {
        let mut out = vec![0.0f32; item_len];
        for ch in 0..c {
            let plane: Vec<f32> = item.iter().skip(ch).step_by(c).copied().collect();
            let blurred = gaussian_filter(&plane, w, h, sigma, truncate)?;
            for (i, v) in blurred.into_iter().enumerate() {
                out[i * c + ch] = v;
            }
        }
        Ok(out)
    };

    #[cfg(feature = "parallel")]
    let items: Vec<Vec<f32>> = data
        .par_chunks(item_len.max(1))
        .map(blur_item)
        .collect::<OpsResult<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let items: Vec<Vec<f32>> = data
        .chunks(item_len.max(1))
        .map(blur_item)
        .collect::<OpsResult<_>>()?;

    let out: Vec<f32> = items.into_iter().flatten().collect();
    Ok(Tensor::new(src.shape().to_vec(), out)?)
}
