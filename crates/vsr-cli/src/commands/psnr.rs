//! PSNR command

use crate::PsnrArgs;
use anyhow::Result;
use tracing::trace;
use vsr_core::Prediction;
use vsr_train::presets::print_psnr;

pub fn run(args: PsnrArgs) -> Result<()> {
    trace!(output = %args.output.display(), label = %args.label.display(), "psnr::run");

    let output = super::load_tensor(&args.output)?;
    let label = super::load_tensor(&args.label)?;
    print_psnr()(&Prediction::Tensor(output), &label)?;
    Ok(())
}
