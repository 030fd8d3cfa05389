//! Saving model predictions.
//!
//! A prediction named `baby` saved under `results/x4` lands in
//! `results/x4/baby_PR.png`. Raw tensors go through
//! [`to_normalized_image`] first; every prediction is stored as RGB.

use crate::IoResult;
use std::path::{Path, PathBuf};
use tracing::info;
use vsr_core::{to_normalized_image, Prediction};

/// File name suffix for saved predictions.
pub const PREDICTION_SUFFIX: &str = "_PR.png";

/// Path a prediction named `name` is written to.
pub fn prediction_path(save_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    save_dir.as_ref().join(format!("{}{}", name, PREDICTION_SUFFIX))
}

/// Normalizes `prediction`, converts it to RGB and writes it as PNG.
///
/// Missing parent directories are created. Returns the written path.
pub fn save_prediction(
    prediction: &Prediction,
    save_dir: impl AsRef<Path>,
    name: &str,
) -> IoResult<PathBuf> {
    let frame = match prediction {
        Prediction::Tensor(t) => to_normalized_image(t)?,
        Prediction::Frame(f) => f.clone(),
    };
    let frame = frame.to_rgb();

    let path = prediction_path(save_dir, name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    crate::png::write(&path, &frame)?;
    info!(path = %path.display(), width = frame.width, height = frame.height, "saved prediction");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsr_core::{ColorMode, Frame, Tensor};

    #[test]
    fn test_prediction_path() {
        assert_eq!(
            prediction_path("out/x2", "baby"),
            PathBuf::from("out/x2").join("baby_PR.png")
        );
    }

    #[test]
    fn test_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let t = Tensor::new(vec![1, 2, 2, 1], vec![0.0, 0.25, 0.5, 1.0]).unwrap();

        let path = save_prediction(&Prediction::Tensor(t), &nested, "img").unwrap();
        assert_eq!(path, nested.join("img_PR.png"));

        let loaded = crate::png::read(&path).unwrap();
        assert_eq!(loaded.mode, ColorMode::Rgb);
        let gray: Vec<u8> = loaded.data.iter().step_by(3).copied().collect();
        assert_eq!(gray, vec![0, 64, 128, 255]);
    }

    #[test]
    fn test_frame_prediction_saved_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let f = Frame::new(1, 1, ColorMode::YCbCr, vec![120, 100, 160]).unwrap();
        let path = save_prediction(&Prediction::Frame(f.clone()), dir.path(), "c").unwrap();
        assert_eq!(crate::png::read(&path).unwrap(), f.to_rgb());
    }

    #[test]
    fn test_invalid_layout_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let t = Tensor::zeros(vec![2, 3, 3, 3]);
        assert!(save_prediction(&Prediction::Tensor(t), dir.path(), "bad").is_err());
        assert!(!prediction_path(dir.path(), "bad").exists());
    }
}
