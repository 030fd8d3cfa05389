//! Ready-made hooks.
//!
//! Each factory captures its configuration and returns a boxed closure for
//! one stage of [`Callbacks`](crate::Callbacks):
//!
//! | factory              | stage   |
//! |----------------------|---------|
//! | [`reduce_residual`]  | output  |
//! | [`save_image`]       | output  |
//! | [`to_rgb`]           | output  |
//! | [`to_gray`]          | feature |
//! | [`to_uv`]            | feature |
//! | [`add_noise`]        | feature |
//! | [`add_random_noise`] | feature |
//! | [`blur`]             | feature |
//! | [`lr_decay`]         | lr      |
//! | [`print_psnr`]       | metric  |

use crate::hooks::{FeatureHook, HookArgs, LrHook, LrState, MetricHook, OutputHook};
use crate::schedule::{DecayParams, LrSchedule};
use crate::{TrainError, TrainResult};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};
use vsr_core::{Prediction, Tensor};
use vsr_ops::noise::{add_gaussian_noise, add_random_gaussian_noise, NoiseRange};
use vsr_ops::{channels, filter, metrics, residual, OpsError};

/// Subtracts the first output from the hook `input`.
///
/// With no outputs the input itself is returned.
pub fn reduce_residual() -> OutputHook {
    Box::new(|outputs: Vec<Prediction>, args: &HookArgs| -> TrainResult<Vec<Prediction>> {
        let input = args.require_input()?;
        let res = outputs.first().map(Prediction::to_array);
        let out = residual::subtract_residual(input, res.as_ref())?;
        Ok(vec![Prediction::Tensor(out)])
    })
}

/// Writes `outputs[output_index]` to `{save_dir}/{name}_PR.png`.
///
/// Outputs pass through unchanged. Nothing is written when there are no
/// outputs.
pub fn save_image(save_dir: impl Into<PathBuf>, output_index: usize) -> OutputHook {
    let save_dir = save_dir.into();
    Box::new(move |outputs: Vec<Prediction>, args: &HookArgs| -> TrainResult<Vec<Prediction>> {
        if outputs.is_empty() {
            return Ok(outputs);
        }
        let prediction = outputs
            .get(output_index)
            .ok_or_else(|| vsr_core::Error::IndexOutOfRange {
                index: output_index,
                len: outputs.len(),
            })?;
        vsr_io::save_prediction(prediction, &save_dir, args.require_name()?)?;
        Ok(outputs)
    })
}

/// Recombines predicted luma planes with the chroma of the hook `input`.
///
/// Every output becomes a YCbCr [`Frame`](vsr_core::Frame).
pub fn to_rgb() -> OutputHook {
    Box::new(|outputs: Vec<Prediction>, args: &HookArgs| -> TrainResult<Vec<Prediction>> {
        let input = args.require_input()?;
        let planes: Vec<Tensor> = outputs.iter().map(Prediction::to_array).collect();
        let frames = channels::colorize(&planes, input)?;
        Ok(frames.into_iter().map(Prediction::Frame).collect())
    })
}

/// Keeps the luma channel.
pub fn to_gray() -> FeatureHook {
    Box::new(|t: Tensor| -> TrainResult<Tensor> { Ok(channels::luma(&t)?) })
}

/// Keeps the chroma channels.
pub fn to_uv() -> FeatureHook {
    Box::new(|t: Tensor| -> TrainResult<Tensor> { Ok(channels::chroma(&t)?) })
}

/// Adds `N(mean, sigma)` noise, clipping to `[0, 255]` when `clip` is set.
///
/// # Errors
///
/// A negative or non-finite `sigma`.
pub fn add_noise(sigma: f32, mean: f32, clip: bool) -> TrainResult<FeatureHook> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(TrainError::invalid(format!(
            "noise sigma must be finite and >= 0, got {}",
            sigma
        )));
    }
    Ok(Box::new(move |t: Tensor| -> TrainResult<Tensor> {
        Ok(add_gaussian_noise(&t, mean, sigma, clip, &mut rand::rng())?)
    }))
}

/// Adds noise whose standard deviation is drawn per call from
/// `low..high` by `step`.
///
/// # Errors
///
/// An empty range, a zero step or a range reaching below zero is rejected
/// here rather than on first use.
pub fn add_random_noise(
    low: i32,
    high: i32,
    step: i32,
    mean: f32,
    clip: bool,
) -> TrainResult<FeatureHook> {
    let range = NoiseRange::new(low, high, step)?;
    debug!(low, high, step, values = range.len(), "random noise range");
    Ok(Box::new(move |t: Tensor| -> TrainResult<Tensor> {
        Ok(add_random_gaussian_noise(&t, range, mean, clip, &mut rand::rng())?)
    }))
}

/// Blur kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurMethod {
    /// Gaussian kernel.
    #[default]
    Gaussian,
}

impl FromStr for BlurMethod {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, OpsError> {
        match s {
            "gaussian" => Ok(BlurMethod::Gaussian),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown blur method '{}'",
                other
            ))),
        }
    }
}

/// Blurs each channel with a Gaussian of width `kernel_width` truncated to
/// `kernel_size / 2` pixels.
pub fn blur(kernel_width: f32, kernel_size: usize, method: &str) -> TrainResult<FeatureHook> {
    let method: BlurMethod = method.parse()?;
    if !kernel_width.is_finite() {
        return Err(TrainError::invalid(format!(
            "kernel width must be finite, got {}",
            kernel_width
        )));
    }
    debug!(?method, kernel_width, kernel_size, "blur hook");
    Ok(Box::new(move |t: Tensor| -> TrainResult<Tensor> {
        Ok(filter::gaussian_blur(&t, kernel_width, kernel_size)?)
    }))
}

/// Learning-rate hook for `method` (`exp`, `poly` or `stair`).
///
/// # Errors
///
/// `InvalidArgument("invalid decay method!")` for any other method name.
pub fn lr_decay(method: &str, lr: f64, params: &DecayParams) -> TrainResult<LrHook> {
    let schedule = LrSchedule::from_method(method, lr, params)?;
    debug!(?schedule, "lr schedule");
    Ok(Box::new(move |state: &LrState| -> f64 { schedule.learning_rate(state.steps) }))
}

/// Prints and returns the PSNR between the output and the label.
///
/// Frames are compared as RGB arrays; a leading batch axis is dropped from
/// 4-D arrays.
pub fn print_psnr() -> MetricHook {
    Box::new(|output: &Prediction, label: &Tensor| -> TrainResult<f64> {
        let output = drop_batch(output.to_array())?;
        let label = drop_batch(label.clone())?;
        let psnr = metrics::psnr(&output, &label)?;
        println!("PSNR = {:.2}dB", psnr);
        info!(psnr, "evaluated");
        Ok(psnr)
    })
}

fn drop_batch(t: Tensor) -> TrainResult<Tensor> {
    if t.ndim() == 4 {
        Ok(t.batch_item(0)?)
    } else {
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vsr_core::{ColorMode, Frame};

    fn ramp(shape: Vec<usize>) -> Tensor {
        let n = shape.iter().product::<usize>();
        Tensor::new(shape, (0..n).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn test_reduce_residual() {
        let input = ramp(vec![1, 2, 2, 1]);
        let args = HookArgs::new().with_input(input.clone());
        let hook = reduce_residual();

        let out = hook(Vec::new(), &args).unwrap();
        assert_eq!(out, vec![Prediction::Tensor(input.clone())]);

        let res = Tensor::new(vec![1, 2, 2, 1], vec![1.0; 4]).unwrap();
        let out = hook(vec![res.into()], &args).unwrap();
        assert_eq!(out[0].as_tensor().unwrap().data(), &[-1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reduce_residual_needs_input() {
        let hook = reduce_residual();
        assert!(matches!(
            hook(Vec::new(), &HookArgs::new()),
            Err(TrainError::MissingArgument("input"))
        ));
    }

    #[test]
    fn test_save_image_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let hook = save_image(dir.path(), 1);
        let args = HookArgs::new().with_name("x");

        assert!(hook(Vec::new(), &HookArgs::new()).unwrap().is_empty());

        let outs: Vec<Prediction> = vec![
            Tensor::zeros(vec![2, 2]).into(),
            Tensor::new(vec![2, 2], vec![0.0, 0.5, 1.0, 0.25]).unwrap().into(),
        ];
        let back = hook(outs.clone(), &args).unwrap();
        assert_eq!(back, outs);
        assert!(dir.path().join("x_PR.png").exists());
    }

    #[test]
    fn test_save_image_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let hook = save_image(dir.path(), 3);
        let args = HookArgs::new().with_name("x");
        let err = hook(vec![Tensor::zeros(vec![2, 2]).into()], &args).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Core(vsr_core::Error::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_to_rgb_produces_frames() {
        let input = Tensor::new(vec![1, 2, 2, 3], vec![128.0; 12]).unwrap();
        let pred = Tensor::new(vec![1, 4, 4, 1], vec![60.0; 16]).unwrap();
        let args = HookArgs::new().with_input(input);
        let out = to_rgb()(vec![pred.into()], &args).unwrap();
        match &out[0] {
            Prediction::Frame(f) => {
                assert_eq!(f.mode, ColorMode::YCbCr);
                assert_eq!(&f.data[..3], &[60, 128, 128]);
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_gray_and_uv() {
        let t = ramp(vec![1, 1, 2, 3]);
        assert_eq!(to_gray()(t.clone()).unwrap().data(), &[0.0, 3.0]);
        assert_eq!(to_uv()(t).unwrap().data(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let t = Tensor::from_u8(vec![2, 2, 1], &[0, 10, 200, 255]).unwrap();
        let out = add_noise(0.0, 0.0, false).unwrap()(t.clone()).unwrap();
        assert_eq!(out.data(), t.data());
    }

    #[test]
    fn test_noise_sigma_validated() {
        assert!(matches!(
            add_noise(-1.0, 0.0, false),
            Err(TrainError::InvalidArgument(_))
        ));
        assert!(add_noise(f32::NAN, 0.0, true).is_err());
        assert!(add_noise(f32::INFINITY, 0.0, true).is_err());
    }

    #[test]
    fn test_noise_clip_bounds() {
        let t = Tensor::from_u8(vec![4, 4, 1], &[250; 16]).unwrap();
        let out = add_noise(50.0, 0.0, true).unwrap()(t).unwrap();
        assert!(out.data().iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_random_noise_range_validated() {
        assert!(add_random_noise(5, 5, 1, 0.0, false).is_err());
        assert!(add_random_noise(0, 10, 0, 0.0, false).is_err());
        assert!(add_random_noise(10, -10, -4, 0.0, false).is_err());
        let hook = add_random_noise(0, 1, 1, 0.0, false).unwrap();
        let t = Tensor::from_u8(vec![2, 1], &[3, 4]).unwrap();
        assert_eq!(hook(t.clone()).unwrap().data(), t.data());
    }

    #[test]
    fn test_blur_unknown_method() {
        assert!(matches!(
            blur(1.0, 3, "box"),
            Err(TrainError::Ops(OpsError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_blur_keeps_shape_and_sum() {
        let mut data = vec![0.0f32; 2 * 7 * 7];
        // centre pixel, channel 0
        data[48] = 100.0;
        let t = Tensor::new(vec![1, 7, 7, 2], data).unwrap();
        let out = blur(1.0, 5, "gaussian").unwrap()(t.clone()).unwrap();
        assert_eq!(out.shape(), t.shape());
        let sum: f32 = out.data().iter().sum();
        assert_relative_eq!(sum, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_lr_decay_hook() {
        let params = DecayParams {
            decay_step: Some(10),
            decay_rate: Some(0.5),
            ..Default::default()
        };
        let hook = lr_decay("exp", 1.0, &params).unwrap();
        let at = |steps| hook(&LrState { lr: 0.0, epochs: 0, steps });
        assert_eq!(at(0), 1.0);
        assert_relative_eq!(at(10), 0.5);
        assert!(matches!(
            lr_decay("unknown", 1.0, &params),
            Err(TrainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_psnr_identical_is_infinite() {
        let t = ramp(vec![1, 2, 2, 3]);
        let psnr = print_psnr()(&t.clone().into(), &t).unwrap();
        assert!(psnr.is_infinite() && psnr > 0.0);
    }

    #[test]
    fn test_psnr_frame_against_batched_label() {
        let f = Frame::new(1, 1, ColorMode::Rgb, vec![10, 20, 30]).unwrap();
        let label = Tensor::new(vec![1, 1, 1, 3], vec![10.0, 20.0, 30.0]).unwrap();
        let psnr = print_psnr()(&f.into(), &label).unwrap();
        assert!(psnr.is_infinite());
    }

    #[test]
    fn test_psnr_batched_output_against_plain_label() {
        let output = Tensor::new(vec![1, 2, 1, 1], vec![0.0, 0.0]).unwrap();
        let label = Tensor::new(vec![2, 1, 1], vec![255.0, 255.0]).unwrap();
        let psnr = print_psnr()(&output.into(), &label).unwrap();
        assert_relative_eq!(psnr, 0.0);
    }

    #[test]
    fn test_psnr_shape_mismatch() {
        let a = Tensor::zeros(vec![2, 2, 3]);
        let b = Tensor::zeros(vec![2, 2, 1]);
        assert!(print_psnr()(&a.into(), &b).is_err());
    }
}
