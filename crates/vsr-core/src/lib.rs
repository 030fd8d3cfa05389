//! # vsr-core
//!
//! Core types shared by the training callback crates.
//!
//! - [`Tensor`] - Dense `f32` array with an NHWC-style shape
//! - [`Frame`] - 8-bit image in a known [`ColorMode`]
//! - [`Prediction`] - A model output as seen by post-processing hooks
//! - [`color`] - Full-range YCbCr <-> RGB conversion
//! - [`normalize`] - Squeeze/scale/clip of raw predictions into frames
//!
//! ## Crate Structure
//!
//! ```text
//! vsr-core (this crate)
//!    ^
//!    +-- vsr-ops   (pixel operations)
//!    +-- vsr-io    (PNG read/write)
//!    +-- vsr-train (hooks, schedules, config)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod frame;
pub mod normalize;
pub mod tensor;

pub use error::{Error, Result};
pub use frame::{ColorMode, Frame, Prediction};
pub use normalize::to_normalized_image;
pub use tensor::{DType, Tensor};
