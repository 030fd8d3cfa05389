//! Noise command
//!
//! Adds Gaussian noise with a fixed or randomly drawn standard deviation.

use crate::NoiseArgs;
use anyhow::{bail, Result};
use tracing::{info, trace};
use vsr_train::presets::{add_noise, add_random_noise};

pub fn run(args: NoiseArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "noise::run");

    let hook = match (&args.sigma, args.range.as_deref()) {
        (Some(sigma), _) => add_noise(*sigma, args.mean, args.clip)?,
        (None, Some(&[low, high])) => add_random_noise(low, high, args.step, args.mean, args.clip)?,
        _ => bail!("either --sigma or --range LOW HIGH is required"),
    };

    let image = super::load_tensor(&args.input)?;
    info!(shape = ?image.shape(), clip = args.clip, "Adding noise");
    let noisy = hook(image)?;

    // Unclipped samples outside [0, 255] saturate when stored
    super::save_tensor(&args.output, &noisy)?;

    if verbose > 0 {
        println!("{} -> {}", args.input.display(), args.output.display());
    }
    Ok(())
}
