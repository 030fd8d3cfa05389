//! # vsr-io
//!
//! Image I/O for the training callbacks.
//!
//! - [`png`] - 8-bit PNG reading and writing of [`Frame`]s
//! - [`save`] - Writing model predictions as `{name}_PR.png`
//!
//! # Example
//!
//! ```rust,ignore
//! use vsr_io::{png, save};
//!
//! let frame = png::read("lr.png")?;
//! let path = save::save_prediction(&prediction, "results", "baby")?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod png;
pub mod save;

pub use error::{IoError, IoResult};
pub use save::{prediction_path, save_prediction};

use std::path::Path;
use vsr_core::{Frame, Tensor};

/// Reads a PNG into a frame.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Frame> {
    png::read(path)
}

/// Reads a PNG as a `[H, W, C]` tensor of 8-bit samples.
pub fn read_tensor<P: AsRef<Path>>(path: P) -> IoResult<Tensor> {
    Ok(png::read(path)?.to_tensor())
}

/// Writes a frame as PNG.
pub fn write<P: AsRef<Path>>(path: P, frame: &Frame) -> IoResult<()> {
    png::write(path, frame)
}
