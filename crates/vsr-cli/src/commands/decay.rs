//! Decay command
//!
//! Prints `step lr` pairs of a learning-rate schedule.

use crate::DecayArgs;
use anyhow::{ensure, Result};
use tracing::trace;
use vsr_train::presets::lr_decay;
use vsr_train::{DecayParams, LrState};

pub fn run(args: DecayArgs) -> Result<()> {
    trace!(method = %args.method, lr = args.lr, "decay::run");
    ensure!(args.every > 0, "--every must be > 0");

    let params = DecayParams {
        decay_step: Some(args.decay_step),
        decay_rate: args.decay_rate,
        end_lr: args.end_lr,
        power: args.power,
    };
    let hook = lr_decay(&args.method, args.lr, &params)?;

    let mut state = LrState {
        lr: args.lr,
        epochs: 0,
        steps: 0,
    };
    for steps in (0..=args.steps).step_by(args.every as usize) {
        state.steps = steps;
        state.lr = hook(&state);
        println!("{:>8} {:.6e}", steps, state.lr);
    }
    Ok(())
}
