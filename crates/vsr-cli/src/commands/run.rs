//! Run command
//!
//! Drives a YAML-configured callback set over a single image. The feature
//! hooks' result stands in for the model output; the decoded YCbCr image is
//! passed to output hooks as `input` and the file stem as `name`.

use crate::RunArgs;
use anyhow::{Context, Result};
use tracing::{debug, info, trace};
use vsr_train::{CallbackConfig, HookArgs};

pub fn run(args: RunArgs, verbose: u8) -> Result<()> {
    trace!(config = %args.config.display(), input = %args.input.display(), "run::run");

    let config = CallbackConfig::from_file(&args.config)?;
    let callbacks = config
        .build()
        .with_context(|| format!("Invalid callbacks in {}", args.config.display()))?;
    debug!(?callbacks, "callbacks ready");

    let input = super::load_ycbcr(&args.input)?;
    let feature = callbacks.on_feature(input.clone())?;
    info!(shape = ?feature.shape(), "features ready");

    let name = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    let mut hook_args = HookArgs::new().with_input(input).with_name(name);

    let label = match &args.label {
        Some(path) => {
            let label = callbacks.on_label(super::load_tensor(path)?)?;
            hook_args = hook_args.with_label(label.clone());
            Some(label)
        }
        None => None,
    };

    let outputs = callbacks.on_output(vec![feature.into()], &hook_args)?;
    if verbose > 0 {
        println!("{} output(s)", outputs.len());
    }

    if let Some(label) = label {
        callbacks.evaluate(&outputs, &label)?;
    }
    Ok(())
}
