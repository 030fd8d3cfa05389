//! Hook signatures and the per-stage callback registry.
//!
//! A training harness calls into four stages:
//!
//! ```text
//! feature/label tensors --> FeatureHook* --> model --> OutputHook* --> MetricHook*
//!                                  step counter --> LrHook
//! ```
//!
//! Hooks of a stage run in registration order, each receiving the previous
//! hook's result.

use crate::{TrainError, TrainResult};
use std::fmt;
use tracing::trace;
use vsr_core::{Prediction, Tensor};

/// Named arguments the harness passes to output hooks.
#[derive(Debug, Clone, Default)]
pub struct HookArgs {
    /// Network input for the current sample.
    pub input: Option<Tensor>,
    /// Ground truth for the current sample.
    pub label: Option<Tensor>,
    /// Sample name, used for output file names.
    pub name: Option<String>,
}

impl HookArgs {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network input.
    pub fn with_input(mut self, input: Tensor) -> Self {
        self.input = Some(input);
        self
    }

    /// Sets the ground truth.
    pub fn with_label(mut self, label: Tensor) -> Self {
        self.label = Some(label);
        self
    }

    /// Sets the sample name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The input, or [`TrainError::MissingArgument`].
    pub fn require_input(&self) -> TrainResult<&Tensor> {
        self.input.as_ref().ok_or(TrainError::MissingArgument("input"))
    }

    /// The name, or [`TrainError::MissingArgument`].
    pub fn require_name(&self) -> TrainResult<&str> {
        self.name.as_deref().ok_or(TrainError::MissingArgument("name"))
    }
}

/// Optimizer state handed to the learning-rate hook.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LrState {
    /// Current learning rate.
    pub lr: f64,
    /// Completed epochs.
    pub epochs: u64,
    /// Completed optimizer steps.
    pub steps: u64,
}

/// Transforms a feature or label tensor before it reaches the model.
pub type FeatureHook = Box<dyn Fn(Tensor) -> TrainResult<Tensor> + Send + Sync>;

/// Transforms model outputs.
pub type OutputHook =
    Box<dyn Fn(Vec<Prediction>, &HookArgs) -> TrainResult<Vec<Prediction>> + Send + Sync>;

/// Computes the next learning rate.
pub type LrHook = Box<dyn Fn(&LrState) -> f64 + Send + Sync>;

/// Scores one output against a label.
pub type MetricHook = Box<dyn Fn(&Prediction, &Tensor) -> TrainResult<f64> + Send + Sync>;

/// Hooks registered per stage.
#[derive(Default)]
pub struct Callbacks {
    feature: Vec<FeatureHook>,
    label: Vec<FeatureHook>,
    output: Vec<OutputHook>,
    lr: Option<LrHook>,
    metrics: Vec<MetricHook>,
}

impl Callbacks {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature hook.
    pub fn with_feature(mut self, hook: FeatureHook) -> Self {
        self.feature.push(hook);
        self
    }

    /// Appends a label hook.
    pub fn with_label(mut self, hook: FeatureHook) -> Self {
        self.label.push(hook);
        self
    }

    /// Appends an output hook.
    pub fn with_output(mut self, hook: OutputHook) -> Self {
        self.output.push(hook);
        self
    }

    /// Sets the learning-rate hook, replacing any previous one.
    pub fn with_lr(mut self, hook: LrHook) -> Self {
        self.lr = Some(hook);
        self
    }

    /// Appends a metric hook.
    pub fn with_metric(mut self, hook: MetricHook) -> Self {
        self.metrics.push(hook);
        self
    }

    /// Runs the feature hooks.
    pub fn on_feature(&self, feature: Tensor) -> TrainResult<Tensor> {
        trace!(hooks = self.feature.len(), "on_feature");
        self.feature.iter().try_fold(feature, |t, hook| hook(t))
    }

    /// Runs the label hooks.
    pub fn on_label(&self, label: Tensor) -> TrainResult<Tensor> {
        trace!(hooks = self.label.len(), "on_label");
        self.label.iter().try_fold(label, |t, hook| hook(t))
    }

    /// Runs the output hooks.
    pub fn on_output(
        &self,
        outputs: Vec<Prediction>,
        args: &HookArgs,
    ) -> TrainResult<Vec<Prediction>> {
        trace!(hooks = self.output.len(), outputs = outputs.len(), "on_output");
        self.output.iter().try_fold(outputs, |o, hook| hook(o, args))
    }

    /// Next learning rate; `state.lr` unchanged without a hook.
    pub fn learning_rate(&self, state: &LrState) -> f64 {
        match &self.lr {
            Some(hook) => hook(state),
            None => state.lr,
        }
    }

    /// Scores the first output with every metric hook.
    pub fn evaluate(&self, outputs: &[Prediction], label: &Tensor) -> TrainResult<Vec<f64>> {
        if self.metrics.is_empty() {
            return Ok(Vec::new());
        }
        let output = outputs.first().ok_or(TrainError::MissingArgument("output"))?;
        self.metrics.iter().map(|m| m(output, label)).collect()
    }

    /// Returns `true` if no hook is registered at all.
    pub fn is_empty(&self) -> bool {
        self.feature.is_empty()
            && self.label.is_empty()
            && self.output.is_empty()
            && self.lr.is_none()
            && self.metrics.is_empty()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("feature", &self.feature.len())
            .field("label", &self.label.len())
            .field("output", &self.output.len())
            .field("lr", &self.lr.is_some())
            .field("metrics", &self.metrics.len())
            .finish()
    }
}
