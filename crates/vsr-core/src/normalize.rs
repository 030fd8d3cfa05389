//! Conversion of raw predictions into displayable frames.
//!
//! Network outputs arrive with batch and channel axes of length 1, in
//! either `[0, 1]` or `[0, 255]` range. [`to_normalized_image`] squeezes
//! them down to `[H, W]` or `[H, W, 3]`, rescales unit-range floats, clips
//! to 8-bit range and picks the color mode from the rank:
//!
//! ```text
//! [1, H, W, 1] -> [H, W]    -> Gray
//! [1, H, W, 3] -> [H, W, 3] -> YCbCr
//! ```

use crate::{ColorMode, DType, Error, Frame, Result, Tensor};
use tracing::trace;

/// Squeezes, scales and clips `tensor` into an 8-bit frame.
///
/// # Errors
///
/// [`Error::InvalidImage`] when the squeezed tensor is neither 2-D nor
/// 3-D with three channels.
///
/// # Example
///
/// ```rust
/// use vsr_core::{to_normalized_image, ColorMode, Tensor};
///
/// let t = Tensor::new(vec![1, 2, 2, 1], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
/// let frame = to_normalized_image(&t).unwrap();
/// assert_eq!(frame.mode, ColorMode::Gray);
/// assert_eq!(frame.data, vec![0, 255, 255, 0]);
/// ```
pub fn to_normalized_image(tensor: &Tensor) -> Result<Frame> {
    let img = tensor.squeeze();
    trace!(shape = ?tensor.shape(), squeezed = ?img.shape(), "to_normalized_image");

    let img = if img.dtype() == DType::F32 && img.max() <= 1.0 {
        img.map(|v| v * 255.0)
    } else {
        img
    };
    let img = img.clip(0.0, 255.0);

    let shape = img.shape().to_vec();
    match *shape.as_slice() {
        [h, w] => {
            let img = Tensor::new(vec![h, w, 1], img.into_data())?;
            Frame::from_tensor(&img, ColorMode::Gray)
        }
        [_, _, 3] => Frame::from_tensor(&img, ColorMode::YCbCr),
        _ => Err(Error::invalid_image(format!(
            "must be a 2-D image or a 3-channel image, got squeezed shape {:?}",
            shape
        ))),
    }
}
