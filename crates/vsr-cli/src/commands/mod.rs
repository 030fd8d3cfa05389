//! CLI command implementations

pub mod blur;
pub mod decay;
pub mod noise;
pub mod psnr;
pub mod run;

use anyhow::{Context, Result};
use std::path::Path;
use vsr_core::color::{quantize, rgb_to_ycbcr_inplace};
use vsr_core::{ColorMode, Frame, Tensor};

/// Loads a PNG as an `[H, W, C]` tensor.
pub fn load_tensor(path: &Path) -> Result<Tensor> {
    vsr_io::read_tensor(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Loads a PNG as a `[1, H, W, 3]` YCbCr tensor with 8-bit samples.
pub fn load_ycbcr(path: &Path) -> Result<Tensor> {
    let frame = vsr_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    let mut rgb = frame.to_rgb().to_tensor();
    rgb_to_ycbcr_inplace(rgb.data_mut());
    let ycc = rgb.map(|v| quantize(v) as f32);
    Ok(Tensor::stack(&[ycc])?)
}

/// Saves an `[H, W, C]` (or single-item `[1, H, W, C]`) tensor of 8-bit
/// range samples as gray or RGB.
pub fn save_tensor(path: &Path, tensor: &Tensor) -> Result<()> {
    let t = if tensor.ndim() == 4 {
        tensor.batch_item(0)?
    } else {
        tensor.clone()
    };
    let mode = match t.channels() {
        1 => ColorMode::Gray,
        _ => ColorMode::Rgb,
    };
    let frame = Frame::from_tensor(&t, mode)
        .with_context(|| format!("Cannot store {:?} as an image", tensor.shape()))?;
    vsr_io::write(path, &frame).with_context(|| format!("Failed to save: {}", path.display()))
}
