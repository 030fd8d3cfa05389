//! Blur command

use crate::BlurArgs;
use anyhow::Result;
use tracing::{info, trace};
use vsr_train::presets::blur;

pub fn run(args: BlurArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), width = args.width, size = args.size, "blur::run");

    let hook = blur(args.width, args.size, &args.method)?;
    let image = super::load_tensor(&args.input)?;
    info!(method = %args.method, width = args.width, size = args.size, "Applying blur");

    let blurred = hook(image)?;
    super::save_tensor(&args.output, &blurred)?;

    if verbose > 0 {
        println!("{} -> {}", args.input.display(), args.output.display());
    }
    Ok(())
}
