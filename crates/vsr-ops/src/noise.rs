//! Gaussian noise injection.
//!
//! Every sample gets an independent draw from `N(mean, stddev)`. The
//! random source is a parameter so augmentation can be reproduced with a
//! seeded generator.
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use vsr_core::Tensor;
//! use vsr_ops::noise::add_gaussian_noise;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let img = Tensor::from_u8(vec![2, 2, 1], &[10, 20, 30, 40]).unwrap();
//! let noisy = add_gaussian_noise(&img, 0.0, 5.0, true, &mut rng).unwrap();
//! assert!(noisy.data().iter().all(|v| (0.0..=255.0).contains(v)));
//! ```

use crate::{OpsError, OpsResult};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, trace};
use vsr_core::{DType, Tensor};

/// Adds Gaussian noise to every sample.
///
/// The result is always [`DType::F32`]. With `clip` the samples are clamped
/// to `[0, 255]`. A negative or non-finite `stddev` is rejected.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    src: &Tensor,
    mean: f32,
    stddev: f32,
    clip: bool,
    rng: &mut R,
) -> OpsResult<Tensor> {
    trace!(shape = ?src.shape(), mean, stddev, clip, "add_gaussian_noise");

    if !stddev.is_finite() || stddev < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "noise stddev must be finite and >= 0, got {}",
            stddev
        )));
    }
    let normal = Normal::new(mean, stddev)
        .map_err(|e| OpsError::InvalidParameter(format!("noise stddev {}: {}", stddev, e)))?;

    let mut out = src.clone().with_dtype(DType::F32);
    for v in out.data_mut() {
        let x = *v + normal.sample(rng);
        *v = if clip { x.clamp(0.0, 255.0) } else { x };
    }
    Ok(out)
}

/// Discrete set of standard deviations, `low..high` by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseRange {
    /// First value (inclusive).
    pub low: i32,
    /// End value (exclusive).
    pub high: i32,
    /// Stride between values; may be negative for a descending range.
    pub step: i32,
}

impl NoiseRange {
    /// Creates a range, rejecting a zero step, an empty range or one that
    /// holds a negative value.
    pub fn new(low: i32, high: i32, step: i32) -> OpsResult<Self> {
        let range = Self { low, high, step };
        if step == 0 {
            return Err(OpsError::InvalidParameter("noise range step must not be zero".into()));
        }
        if range.len() == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "noise range {}..{} by {} is empty",
                low, high, step
            )));
        }
        let smallest = if step > 0 { Some(low) } else { range.nth(range.len() - 1) };
        if smallest.is_none_or(|v| v < 0) {
            return Err(OpsError::InvalidParameter(format!(
                "noise range {}..{} by {} holds negative values",
                low, high, step
            )));
        }
        Ok(range)
    }

    /// Number of values in the range.
    pub fn len(&self) -> usize {
        let (low, high, step) = (self.low as i64, self.high as i64, self.step as i64);
        if step > 0 && low < high {
            ((high - low + step - 1) / step) as usize
        } else if step < 0 && low > high {
            ((low - high - step - 1) / -step) as usize
        } else {
            0
        }
    }

    /// Returns `true` if the range holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th value of the range, `None` past the end.
    #[inline]
    pub fn nth(&self, i: usize) -> Option<i32> {
        if i >= self.len() {
            return None;
        }
        let v = self.low as i64 + self.step as i64 * i as i64;
        i32::try_from(v).ok()
    }

    /// Picks one value uniformly, `None` for an empty range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<i32> {
        if self.is_empty() {
            return None;
        }
        let v = self.nth(rng.random_range(0..self.len()))?;
        debug!(stddev = v, "picked noise level");
        Some(v)
    }
}

/// Adds Gaussian noise whose standard deviation is drawn from `range`.
pub fn add_random_gaussian_noise<R: Rng + ?Sized>(
    src: &Tensor,
    range: NoiseRange,
    mean: f32,
    clip: bool,
    rng: &mut R,
) -> OpsResult<Tensor> {
    let stddev = range
        .sample(rng)
        .ok_or_else(|| OpsError::InvalidParameter("noise range is empty".into()))?;
    add_gaussian_noise(src, mean, stddev as f32, clip, rng)
}
