//! Learning-rate decay schedules.
//!
//! | method  | formula                                                   |
//! |---------|-----------------------------------------------------------|
//! | `exp`   | `lr * rate ^ (steps / decay_step)`                        |
//! | `poly`  | `(lr - end_lr) * (1 - steps / decay_step) ^ power + end_lr` |
//! | `stair` | `lr * rate ^ floor(steps / decay_step)`                   |
//!
//! Polynomial decay holds at `end_lr` once `steps` passes `decay_step`.
//!
//! # Example
//!
//! ```rust
//! use vsr_train::schedule::{DecayParams, LrSchedule};
//!
//! let params = DecayParams { decay_step: Some(10), decay_rate: Some(0.5), ..Default::default() };
//! let s = LrSchedule::from_method("stair", 1.0, &params).unwrap();
//! assert_eq!(s.learning_rate(19), 0.5);
//! ```

use crate::{TrainError, TrainResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Name of a decay formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayMethod {
    /// Continuous exponential decay.
    Exponential,
    /// Polynomial decay toward `end_lr`.
    Polynomial,
    /// Exponential decay applied in whole `decay_step` intervals.
    Staircase,
}

impl FromStr for DecayMethod {
    type Err = TrainError;

    fn from_str(s: &str) -> TrainResult<Self> {
        match s {
            "exp" => Ok(DecayMethod::Exponential),
            "poly" => Ok(DecayMethod::Polynomial),
            "stair" => Ok(DecayMethod::Staircase),
            _ => Err(TrainError::invalid("invalid decay method!")),
        }
    }
}

impl fmt::Display for DecayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecayMethod::Exponential => "exp",
            DecayMethod::Polynomial => "poly",
            DecayMethod::Staircase => "stair",
        })
    }
}

/// Parameters shared by the decay formulas; each method reads what it needs.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DecayParams {
    /// Steps per decay period.
    pub decay_step: Option<u64>,
    /// Multiplier per period (`exp`, `stair`).
    pub decay_rate: Option<f64>,
    /// Final learning rate (`poly`, default 0).
    pub end_lr: Option<f64>,
    /// Polynomial exponent (`poly`, default 1).
    pub power: Option<f64>,
}

/// A fully parameterized schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LrSchedule {
    /// `start_lr * decay_rate ^ (steps / decay_step)`
    Exponential {
        /// Initial learning rate.
        start_lr: f64,
        /// Steps per decay period.
        decay_step: u64,
        /// Multiplier per period.
        decay_rate: f64,
    },
    /// `(start_lr - end_lr) * (1 - steps / decay_step) ^ power + end_lr`
    Polynomial {
        /// Initial learning rate.
        start_lr: f64,
        /// Final learning rate.
        end_lr: f64,
        /// Steps until `end_lr` is reached.
        decay_step: u64,
        /// Polynomial exponent.
        power: f64,
    },
    /// `start_lr * decay_rate ^ floor(steps / decay_step)`
    Staircase {
        /// Initial learning rate.
        start_lr: f64,
        /// Steps per decay period.
        decay_step: u64,
        /// Multiplier per period.
        decay_rate: f64,
    },
}

impl LrSchedule {
    /// Builds a schedule from a method name (`exp`, `poly`, `stair`).
    ///
    /// # Errors
    ///
    /// [`TrainError::InvalidArgument`] for an unknown method, a missing
    /// required parameter or a zero `decay_step`.
    pub fn from_method(method: &str, lr: f64, params: &DecayParams) -> TrainResult<Self> {
        Self::new(method.parse()?, lr, params)
    }

    /// Builds a schedule for `method`.
    pub fn new(method: DecayMethod, lr: f64, params: &DecayParams) -> TrainResult<Self> {
        let decay_step = params
            .decay_step
            .ok_or_else(|| TrainError::invalid(format!("{} decay requires decay_step", method)))?;
        if decay_step == 0 {
            return Err(TrainError::invalid("decay_step must be > 0"));
        }
        let rate = || {
            params
                .decay_rate
                .ok_or_else(|| TrainError::invalid(format!("{} decay requires decay_rate", method)))
        };

        Ok(match method {
            DecayMethod::Exponential => LrSchedule::Exponential {
                start_lr: lr,
                decay_step,
                decay_rate: rate()?,
            },
            DecayMethod::Staircase => LrSchedule::Staircase {
                start_lr: lr,
                decay_step,
                decay_rate: rate()?,
            },
            DecayMethod::Polynomial => LrSchedule::Polynomial {
                start_lr: lr,
                end_lr: params.end_lr.unwrap_or(0.0),
                decay_step,
                power: params.power.unwrap_or(1.0),
            },
        })
    }

    /// Learning rate after `steps` optimizer steps.
    pub fn learning_rate(&self, steps: u64) -> f64 {
        match *self {
            LrSchedule::Exponential {
                start_lr,
                decay_step,
                decay_rate,
            } => start_lr * decay_rate.powf(steps as f64 / decay_step as f64),
            LrSchedule::Polynomial {
                start_lr,
                end_lr,
                decay_step,
                power,
            } => {
                let progress = steps.min(decay_step) as f64 / decay_step as f64;
                (start_lr - end_lr) * (1.0 - progress).powf(power) + end_lr
            }
            LrSchedule::Staircase {
                start_lr,
                decay_step,
                decay_rate,
            } => start_lr * decay_rate.powf((steps / decay_step) as f64),
        }
    }
}
