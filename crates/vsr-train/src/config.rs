//! YAML callback configuration.
//!
//! ```yaml
//! feature:
//!   - { type: noise, sigma: 5.0, clip: true }
//!   - { type: blur, width: 1.5, size: 5 }
//! output:
//!   - { type: rgb }
//!   - { type: save, dir: out }
//! lr: { method: exp, lr: 0.001, decay_step: 1000, decay_rate: 0.5 }
//! metrics: [ { type: psnr } ]
//! ```
//!
//! Every section is optional. [`CallbackConfig::build`] turns the parsed
//! description into a [`Callbacks`] registry through the factories in
//! [`presets`](crate::presets).

use crate::hooks::{Callbacks, FeatureHook, MetricHook, OutputHook};
use crate::presets;
use crate::schedule::DecayParams;
use crate::{TrainError, TrainResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// A feature or label hook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// [`presets::add_noise`]
    Noise {
        /// Standard deviation.
        sigma: f32,
        /// Noise mean.
        #[serde(default)]
        mean: f32,
        /// Clip to `[0, 255]`.
        #[serde(default)]
        clip: bool,
    },
    /// [`presets::add_random_noise`]
    RandomNoise {
        /// Smallest standard deviation (inclusive).
        low: i32,
        /// Upper bound (exclusive).
        high: i32,
        /// Stride.
        #[serde(default = "default_step")]
        step: i32,
        /// Noise mean.
        #[serde(default)]
        mean: f32,
        /// Clip to `[0, 255]`.
        #[serde(default)]
        clip: bool,
    },
    /// [`presets::blur`]
    Blur {
        /// Gaussian sigma.
        width: f32,
        /// Kernel size in pixels.
        size: usize,
        /// Kernel family.
        #[serde(default = "default_blur_method")]
        method: String,
    },
    /// [`presets::to_gray`]
    Gray,
    /// [`presets::to_uv`]
    Uv,
}

/// An output hook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputSpec {
    /// [`presets::reduce_residual`]
    Residual,
    /// [`presets::to_rgb`]
    Rgb,
    /// [`presets::save_image`]
    Save {
        /// Output directory.
        #[serde(default = "default_save_dir")]
        dir: PathBuf,
        /// Which output to write.
        #[serde(default)]
        index: usize,
    },
}

/// A metric hook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricSpec {
    /// [`presets::print_psnr`]
    Psnr,
}

/// Learning-rate schedule section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LrSpec {
    /// `exp`, `poly` or `stair`.
    pub method: String,
    /// Initial learning rate.
    pub lr: f64,
    /// Method parameters.
    #[serde(flatten)]
    pub params: DecayParams,
}

/// Parsed callback configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallbackConfig {
    /// Feature hooks, in order.
    pub feature: Vec<FeatureSpec>,
    /// Label hooks, in order.
    pub label: Vec<FeatureSpec>,
    /// Output hooks, in order.
    pub output: Vec<OutputSpec>,
    /// Learning-rate schedule.
    pub lr: Option<LrSpec>,
    /// Metric hooks.
    pub metrics: Vec<MetricSpec>,
}

fn default_step() -> i32 {
    1
}

fn default_blur_method() -> String {
    "gaussian".into()
}

fn default_save_dir() -> PathBuf {
    PathBuf::from(".")
}

impl CallbackConfig {
    /// Loads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> TrainResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| TrainError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> TrainResult<Self> {
        let config: CallbackConfig = serde_yaml::from_str(yaml)?;
        debug!(
            feature = config.feature.len(),
            label = config.label.len(),
            output = config.output.len(),
            lr = config.lr.is_some(),
            metrics = config.metrics.len(),
            "parsed callback config"
        );
        Ok(config)
    }

    /// Instantiates every hook.
    ///
    /// # Errors
    ///
    /// The first factory error, e.g. an unknown decay method or an empty
    /// noise range.
    pub fn build(&self) -> TrainResult<Callbacks> {
        let mut callbacks = Callbacks::new();
        for spec in &self.feature {
            callbacks = callbacks.with_feature(spec.build()?);
        }
        for spec in &self.label {
            callbacks = callbacks.with_label(spec.build()?);
        }
        for spec in &self.output {
            callbacks = callbacks.with_output(spec.build());
        }
        if let Some(lr) = &self.lr {
            callbacks = callbacks.with_lr(presets::lr_decay(&lr.method, lr.lr, &lr.params)?);
        }
        for spec in &self.metrics {
            callbacks = callbacks.with_metric(spec.build());
        }
        Ok(callbacks)
    }
}

impl FromStr for CallbackConfig {
    type Err = TrainError;

    fn from_str(s: &str) -> TrainResult<Self> {
        Self::from_yaml_str(s)
    }
}

impl FeatureSpec {
    /// Creates the hook.
    pub fn build(&self) -> TrainResult<FeatureHook> {
        Ok(match self {
            FeatureSpec::Noise { sigma, mean, clip } => {
                presets::add_noise(*sigma, *mean, *clip)?
            }
            FeatureSpec::RandomNoise {
                low,
                high,
                step,
                mean,
                clip,
            } => presets::add_random_noise(*low, *high, *step, *mean, *clip)?,
            FeatureSpec::Blur {
                width,
                size,
                method,
            } => presets::blur(*width, *size, method)?,
            FeatureSpec::Gray => presets::to_gray(),
            FeatureSpec::Uv => presets::to_uv(),
        })
    }
}

impl OutputSpec {
    /// Creates the hook.
    pub fn build(&self) -> OutputHook {
        match self {
            OutputSpec::Residual => presets::reduce_residual(),
            OutputSpec::Rgb => presets::to_rgb(),
            OutputSpec::Save { dir, index } => presets::save_image(dir.clone(), *index),
        }
    }
}

impl MetricSpec {
    /// Creates the hook.
    pub fn build(&self) -> MetricHook {
        match self {
            MetricSpec::Psnr => presets::print_psnr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
feature:
  - { type: noise, sigma: 5.0, clip: true }
  - { type: random_noise, low: 0, high: 50, step: 5 }
  - { type: blur, width: 1.5, size: 5 }
  - { type: gray }
  - { type: uv }
label: []
output:
  - { type: residual }
  - { type: rgb }
  - { type: save, dir: out, index: 0 }
lr: { method: exp, lr: 0.001, decay_step: 1000, decay_rate: 0.5 }
metrics: [ { type: psnr } ]
"#;

    #[test]
    fn test_parse_full() {
        let cfg: CallbackConfig = FULL.parse().unwrap();
        assert_eq!(cfg.feature.len(), 5);
        assert_eq!(
            cfg.feature[0],
            FeatureSpec::Noise {
                sigma: 5.0,
                mean: 0.0,
                clip: true
            }
        );
        assert_eq!(
            cfg.feature[2],
            FeatureSpec::Blur {
                width: 1.5,
                size: 5,
                method: "gaussian".into()
            }
        );
        assert_eq!(
            cfg.output[2],
            OutputSpec::Save {
                dir: PathBuf::from("out"),
                index: 0
            }
        );
        let lr = cfg.lr.as_ref().unwrap();
        assert_eq!(lr.method, "exp");
        assert_eq!(lr.params.decay_step, Some(1000));
        assert_eq!(lr.params.decay_rate, Some(0.5));
        assert_eq!(cfg.metrics, vec![MetricSpec::Psnr]);

        let callbacks = cfg.build().unwrap();
        assert!(!callbacks.is_empty());
    }

    #[test]
    fn test_defaults() {
        let cfg = CallbackConfig::from_yaml_str("output: [ { type: save } ]").unwrap();
        assert_eq!(
            cfg.output[0],
            OutputSpec::Save {
                dir: PathBuf::from("."),
                index: 0
            }
        );
        assert!(cfg.feature.is_empty() && cfg.lr.is_none());
    }

    #[test]
    fn test_empty_document() {
        let cfg = CallbackConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, CallbackConfig::default());
        assert!(cfg.build().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_hook_type() {
        let err = CallbackConfig::from_yaml_str("feature: [ { type: sharpen } ]").unwrap_err();
        assert!(matches!(err, TrainError::Yaml(_)));
    }

    #[test]
    fn test_build_errors_surface() {
        let cfg = CallbackConfig::from_yaml_str("lr: { method: cosine, lr: 0.1, decay_step: 10 }")
            .unwrap();
        assert!(matches!(cfg.build(), Err(TrainError::InvalidArgument(_))));

        let cfg =
            CallbackConfig::from_yaml_str("feature: [ { type: random_noise, low: 3, high: 3 } ]")
                .unwrap();
        assert!(cfg.build().is_err());

        let cfg = CallbackConfig::from_yaml_str(
            "feature: [ { type: blur, width: 1.0, size: 3, method: box } ]",
        )
        .unwrap();
        assert!(cfg.build().is_err());

        let cfg =
            CallbackConfig::from_yaml_str("label: [ { type: noise, sigma: -2.0 } ]").unwrap();
        assert!(matches!(cfg.build(), Err(TrainError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("callbacks.yaml");
        std::fs::write(&path, FULL).unwrap();
        let cfg = CallbackConfig::from_file(&path).unwrap();
        assert_eq!(cfg.output.len(), 3);

        let missing = CallbackConfig::from_file(dir.path().join("none.yaml")).unwrap_err();
        assert!(matches!(missing, TrainError::ConfigRead { .. }));
    }
}
