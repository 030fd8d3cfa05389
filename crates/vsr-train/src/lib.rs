//! # vsr-train
//!
//! Callback helpers for a super-resolution training loop.
//!
//! A harness owns a [`Callbacks`] registry and calls it at fixed points:
//! after loading features and labels, after running the model, when
//! stepping the optimizer, and when evaluating. The hooks themselves are
//! plain closures produced by the factories in [`presets`].
//!
//! # Modules
//!
//! - [`hooks`] - Hook signatures, [`HookArgs`], [`LrState`], [`Callbacks`]
//! - [`presets`] - Residual, save, colorize, noise, blur, lr decay, PSNR
//! - [`schedule`] - Learning-rate decay formulas
//! - [`config`] - YAML description of a callback set
//!
//! # Example
//!
//! ```rust
//! use vsr_core::Tensor;
//! use vsr_train::{presets, Callbacks, HookArgs};
//!
//! let callbacks = Callbacks::new()
//!     .with_feature(presets::to_gray())
//!     .with_output(presets::reduce_residual());
//!
//! let lr_image = Tensor::new(vec![1, 2, 2, 3], vec![100.0; 12]).unwrap();
//! let feature = callbacks.on_feature(lr_image).unwrap();
//! assert_eq!(feature.shape(), &[1, 2, 2, 1]);
//!
//! let args = HookArgs::new().with_input(feature.clone());
//! let out = callbacks.on_output(vec![feature.into()], &args).unwrap();
//! assert!(out[0].as_tensor().unwrap().data().iter().all(|&v| v == 0.0));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod hooks;
pub mod presets;
pub mod schedule;

pub use config::CallbackConfig;
pub use error::{TrainError, TrainResult};
pub use hooks::{Callbacks, FeatureHook, HookArgs, LrHook, LrState, MetricHook, OutputHook};
pub use schedule::{DecayMethod, DecayParams, LrSchedule};
