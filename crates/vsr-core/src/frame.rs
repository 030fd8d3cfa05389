//! 8-bit image frames and model predictions.
//!
//! A [`Frame`] is what a prediction becomes once it is meant for display or
//! disk: quantized samples in a known [`ColorMode`]. A [`Prediction`] is
//! what post-processing hooks pass along; it starts as a raw [`Tensor`] and
//! may be turned into a frame by a colorizing hook.

use crate::color::{quantize, ycbcr_to_rgb};
use crate::{DType, Error, Result, Tensor};

/// Channel layout of a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Single luminance channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Full-range luma plus chroma.
    YCbCr,
}

impl ColorMode {
    /// Number of interleaved channels.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray => 1,
            ColorMode::Rgb | ColorMode::YCbCr => 3,
        }
    }
}

/// Interleaved 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout.
    pub mode: ColorMode,
    /// Row-major interleaved samples.
    pub data: Vec<u8>,
}

impl Frame {
    /// Creates a frame, validating the buffer length.
    pub fn new(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(Error::buffer_size(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// Quantizes an `[H, W, C]` tensor (values in `[0, 255]`) into a frame.
    pub fn from_tensor(tensor: &Tensor, mode: ColorMode) -> Result<Self> {
        let [h, w, c] = *tensor.shape() else {
            return Err(Error::invalid_image(format!(
                "expected [H, W, C], got {:?}",
                tensor.shape()
            )));
        };
        if c != mode.channels() {
            return Err(Error::invalid_image(format!(
                "{:?} needs {} channels, got {}",
                mode,
                mode.channels(),
                c
            )));
        }
        let data = tensor.data().iter().map(|&v| quantize(v)).collect();
        Self::new(w as u32, h as u32, mode, data)
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Converts to an RGB frame.
    ///
    /// Gray is replicated into three channels, YCbCr goes through the
    /// full-range inverse transform.
    pub fn to_rgb(&self) -> Frame {
        let data = match self.mode {
            ColorMode::Rgb => self.data.clone(),
            ColorMode::Gray => self.data.iter().flat_map(|&g| [g, g, g]).collect(),
            ColorMode::YCbCr => self
                .data
                .chunks_exact(3)
                .flat_map(|px| {
                    ycbcr_to_rgb([px[0] as f32, px[1] as f32, px[2] as f32]).map(quantize)
                })
                .collect(),
        };
        Frame {
            width: self.width,
            height: self.height,
            mode: ColorMode::Rgb,
            data,
        }
    }

    /// Returns the samples as a `[H, W, C]` tensor of type `U8`.
    pub fn to_tensor(&self) -> Tensor {
        let shape = vec![self.height as usize, self.width as usize, self.channels()];
        let data = self.data.iter().map(|&v| v as f32).collect();
        Tensor::from_parts(shape, data, DType::U8)
    }
}

/// A model output as seen by post-processing hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Raw network output.
    Tensor(Tensor),
    /// Output already converted to an image.
    Frame(Frame),
}

impl Prediction {
    /// Returns the raw tensor, if this prediction has not been converted.
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Prediction::Tensor(t) => Some(t),
            Prediction::Frame(_) => None,
        }
    }

    /// Returns the prediction as an array; frames are converted to RGB first.
    pub fn to_array(&self) -> Tensor {
        match self {
            Prediction::Tensor(t) => t.clone(),
            Prediction::Frame(f) => f.to_rgb().to_tensor(),
        }
    }
}

impl From<Tensor> for Prediction {
    fn from(t: Tensor) -> Self {
        Prediction::Tensor(t)
    }
}

impl From<Frame> for Prediction {
    fn from(f: Frame) -> Self {
        Prediction::Frame(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(Frame::new(2, 2, ColorMode::Rgb, vec![0; 12]).is_ok());
        assert!(Frame::new(2, 2, ColorMode::Rgb, vec![0; 4]).is_err());
    }

    #[test]
    fn test_gray_to_rgb() {
        let f = Frame::new(2, 1, ColorMode::Gray, vec![10, 200]).unwrap();
        let rgb = f.to_rgb();
        assert_eq!(rgb.mode, ColorMode::Rgb);
        assert_eq!(rgb.data, vec![10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn test_neutral_ycbcr_to_rgb() {
        let f = Frame::new(1, 1, ColorMode::YCbCr, vec![77, 128, 128]).unwrap();
        assert_eq!(f.to_rgb().data, vec![77, 77, 77]);
    }

    #[test]
    fn test_from_tensor_quantizes() {
        let t = Tensor::new(vec![1, 2, 1], vec![-4.0, 254.7]).unwrap();
        let f = Frame::from_tensor(&t, ColorMode::Gray).unwrap();
        assert_eq!(f.data, vec![0, 255]);
        assert!(Frame::from_tensor(&t, ColorMode::Rgb).is_err());
    }

    #[test]
    fn test_prediction_to_array() {
        let f = Frame::new(1, 1, ColorMode::Gray, vec![9]).unwrap();
        let arr = Prediction::from(f).to_array();
        assert_eq!(arr.shape(), &[1, 1, 3]);
        assert_eq!(arr.data(), &[9.0, 9.0, 9.0]);
    }
}
