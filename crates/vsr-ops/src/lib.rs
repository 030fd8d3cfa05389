//! # vsr-ops
//!
//! Pixel operations behind the training callbacks.
//!
//! # Modules
//!
//! - [`residual`] - Residual subtraction
//! - [`channels`] - Luma/chroma slicing and colorization
//! - [`resize`] - Separable resampling
//! - [`noise`] - Gaussian noise injection
//! - [`filter`] - Gaussian spatial filter
//! - [`metrics`] - MSE and PSNR
//!
//! # Example
//!
//! ```rust
//! use vsr_core::Tensor;
//! use vsr_ops::metrics::psnr;
//!
//! let a = Tensor::new(vec![2, 2, 1], vec![10.0, 20.0, 30.0, 40.0]).unwrap();
//! assert!(psnr(&a, &a).unwrap().is_infinite());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod channels;
pub mod filter;
pub mod metrics;
pub mod noise;
pub mod residual;
pub mod resize;

pub use error::{OpsError, OpsResult};
