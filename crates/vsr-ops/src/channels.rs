//! Luma/chroma channel handling.
//!
//! Super-resolution models commonly work on the luma plane only. These
//! helpers split a YCbCr array into its planes and rebuild a color image
//! from a predicted luma plane plus upsampled chroma from the
//! low-resolution input.

use crate::resize::rescale;
use crate::{OpsError, OpsResult};
use tracing::{debug, trace};
use vsr_core::color::quantize;
use vsr_core::{ColorMode, Frame, Tensor};

/// First channel of the last axis (`x[..., 0:1]`).
pub fn luma(src: &Tensor) -> OpsResult<Tensor> {
    Ok(src.slice_channels(0..1)?)
}

/// Every channel after the first (`x[..., 1:]`).
pub fn chroma(src: &Tensor) -> OpsResult<Tensor> {
    let c = src.channels();
    if c < 2 {
        return Err(OpsError::InvalidDimensions(format!(
            "chroma needs at least 2 channels, got {}",
            c
        )));
    }
    Ok(src.slice_channels(1..c)?)
}

/// Drops a leading batch axis of length >= 1 by taking item 0.
fn first_item(t: &Tensor) -> OpsResult<Tensor> {
    match t.ndim() {
        3 => Ok(t.clone()),
        4 => Ok(t.batch_item(0)?),
        _ => Err(OpsError::InvalidDimensions(format!(
            "expected [H, W, C] or [N, H, W, C], got {:?}",
            t.shape()
        ))),
    }
}

/// Rebuilds YCbCr frames from predicted luma planes.
///
/// `input` is the low-resolution YCbCr image (`[1, H, W, 3]` or
/// `[H, W, 3]`). Each output must hold one channel; its chroma is taken
/// from `input`, upscaled by the integer ratio between the output and
/// input sizes with bicubic filtering.
///
/// # Example
///
/// ```rust
/// use vsr_core::{ColorMode, Tensor};
/// use vsr_ops::channels::colorize;
///
/// let input = Tensor::new(vec![1, 2, 2, 3], vec![128.0; 12]).unwrap();
/// let luma = Tensor::new(vec![1, 4, 4, 1], vec![50.0; 16]).unwrap();
/// let frames = colorize(&[luma], &input).unwrap();
/// assert_eq!(frames[0].mode, ColorMode::YCbCr);
/// assert_eq!((frames[0].width, frames[0].height), (4, 4));
/// ```
pub fn colorize(outputs: &[Tensor], input: &Tensor) -> OpsResult<Vec<Frame>> {
    let src = first_item(input)?;
    let (_, h, w, c) = src.as_nhwc()?;
    if c != 3 {
        return Err(OpsError::InvalidDimensions(format!(
            "input must be a 3-channel YCbCr image, got {} channels",
            c
        )));
    }
    // Chroma source goes through 8-bit quantization like any decoded image.
    let ycc: Vec<f32> = src.data().iter().map(|&v| quantize(v) as f32).collect();

    let mut frames = Vec::with_capacity(outputs.len());
    for out in outputs {
        trace!(shape = ?out.shape(), "colorize output");
        let y = first_item(out)?;
        let (_, oh, ow, oc) = y.as_nhwc()?;
        if oc != 1 {
            return Err(OpsError::InvalidDimensions(format!(
                "predicted plane must have 1 channel, got {}",
                oc
            )));
        }

        let scale = (oh / h.max(1), ow / w.max(1));
        let (up, uw, uh) = rescale(&ycc, w, h, 3, scale)?;
        if (uh, uw) != (oh, ow) {
            return Err(OpsError::SizeMismatch(format!(
                "upscaled chroma is {}x{}, prediction is {}x{}",
                uw, uh, ow, oh
            )));
        }
        debug!(?scale, width = ow, height = oh, "colorizing prediction");

        let up = Tensor::new(vec![uh, uw, 3], up.iter().map(|&v| quantize(v) as f32).collect())?;
        let uv = up.slice_channels(1..3)?;
        let merged = Tensor::concat_channels(&[&y, &uv])?.clip(0.0, 255.0);
        frames.push(Frame::from_tensor(&merged, ColorMode::YCbCr)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ycc_input(h: usize, w: usize, px: [f32; 3]) -> Tensor {
        let data = (0..h * w).flat_map(|_| px).collect();
        Tensor::new(vec![1, h, w, 3], data).unwrap()
    }

    #[test]
    fn test_luma_and_chroma() {
        let t = ycc_input(2, 2, [10.0, 20.0, 30.0]);
        let y = luma(&t).unwrap();
        assert_eq!(y.shape(), &[1, 2, 2, 1]);
        assert!(y.data().iter().all(|&v| v == 10.0));
        let uv = chroma(&t).unwrap();
        assert_eq!(uv.shape(), &[1, 2, 2, 2]);
        assert_eq!(&uv.data()[..2], &[20.0, 30.0]);
    }

    #[test]
    fn test_chroma_needs_two_channels() {
        let t = Tensor::zeros(vec![2, 2, 1]);
        assert!(chroma(&t).is_err());
    }

    #[test]
    fn test_colorize_keeps_luma_and_flat_chroma() {
        let input = ycc_input(3, 3, [0.0, 90.0, 200.0]);
        let pred: Vec<f32> = (0..36).map(|v| v as f32 * 7.0).collect();
        let pred = Tensor::new(vec![1, 6, 6, 1], pred).unwrap();

        let frames = colorize(&[pred.clone()], &input).unwrap();
        assert_eq!(frames.len(), 1);
        let f = &frames[0];
        assert_eq!((f.width, f.height), (6, 6));
        for (i, px) in f.data.chunks_exact(3).enumerate() {
            assert_eq!(px[0], quantize(pred.data()[i]));
            assert_eq!(px[1], 90);
            assert_eq!(px[2], 200);
        }
    }

    #[test]
    fn test_colorize_clips_luma() {
        let input = ycc_input(1, 1, [0.0, 128.0, 128.0]);
        let pred = Tensor::new(vec![2, 2, 1], vec![-20.0, 300.0, 10.0, 20.0]).unwrap();
        let frames = colorize(&[pred], &input).unwrap();
        let lumas: Vec<u8> = frames[0].data.iter().step_by(3).copied().collect();
        assert_eq!(lumas, vec![0, 255, 10, 20]);
    }

    #[test]
    fn test_colorize_rejects_multichannel_prediction() {
        let input = ycc_input(2, 2, [0.0, 128.0, 128.0]);
        let pred = Tensor::zeros(vec![1, 4, 4, 3]);
        assert!(matches!(
            colorize(&[pred], &input),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_colorize_rejects_fractional_scale() {
        let input = ycc_input(2, 2, [0.0, 128.0, 128.0]);
        let pred = Tensor::zeros(vec![1, 5, 4, 1]);
        assert!(matches!(
            colorize(&[pred], &input),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
