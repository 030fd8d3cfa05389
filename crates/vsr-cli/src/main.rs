//! vsr - super-resolution training callbacks from the command line
//!
//! Runs the augmentation, post-processing, schedule and metric hooks on
//! PNG files, either one at a time or as a YAML-configured callback set.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vsr")]
#[command(author, version, about = "Super-resolution training callbacks")]
#[command(long_about = "
Applies the training-loop callbacks of a super-resolution pipeline to PNG files.

Examples:
  vsr psnr sr.png hr.png                     # Compare prediction with ground truth
  vsr noise lr.png -o noisy.png --sigma 10 --clip
  vsr noise lr.png -o noisy.png --range 0 50 --step 5
  vsr blur lr.png -o blurred.png --width 1.5 --size 5
  vsr decay --method exp --lr 0.001 --decay-step 1000 --decay-rate 0.5 --steps 5000
  vsr run --config callbacks.yaml lr.png --label hr.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// PSNR between a prediction and its ground truth
    Psnr(PsnrArgs),

    /// Add Gaussian noise
    #[command(visible_alias = "n")]
    Noise(NoiseArgs),

    /// Apply Gaussian blur
    #[command(visible_alias = "b")]
    Blur(BlurArgs),

    /// Print a learning-rate schedule
    Decay(DecayArgs),

    /// Run a YAML-configured callback set on one image
    Run(RunArgs),
}

#[derive(Args)]
struct PsnrArgs {
    /// Predicted image
    output: PathBuf,

    /// Ground-truth image
    label: PathBuf,
}

#[derive(Args)]
struct NoiseArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Fixed standard deviation
    #[arg(long, conflicts_with = "range", required_unless_present = "range")]
    sigma: Option<f32>,

    /// Pick the standard deviation from LOW..HIGH on each run
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"], allow_negative_numbers = true)]
    range: Option<Vec<i32>>,

    /// Stride of --range
    #[arg(long, default_value = "1", requires = "range", allow_negative_numbers = true)]
    step: i32,

    /// Noise mean
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    mean: f32,

    /// Clip to [0, 255]
    #[arg(long)]
    clip: bool,
}

#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Gaussian sigma
    #[arg(short, long)]
    width: f32,

    /// Kernel size in pixels
    #[arg(short, long)]
    size: usize,

    /// Kernel family
    #[arg(short = 't', long, default_value = "gaussian")]
    method: String,
}

#[derive(Args)]
struct DecayArgs {
    /// Decay method: exp, poly, stair
    #[arg(short, long)]
    method: String,

    /// Initial learning rate
    #[arg(long)]
    lr: f64,

    /// Steps per decay period
    #[arg(long)]
    decay_step: u64,

    /// Multiplier per period (exp, stair)
    #[arg(long)]
    decay_rate: Option<f64>,

    /// Final learning rate (poly)
    #[arg(long)]
    end_lr: Option<f64>,

    /// Polynomial exponent (poly)
    #[arg(long)]
    power: Option<f64>,

    /// Last step to print
    #[arg(long)]
    steps: u64,

    /// Print every K steps
    #[arg(long, default_value = "1")]
    every: u64,
}

#[derive(Args)]
struct RunArgs {
    /// Callback configuration (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Input image
    input: PathBuf,

    /// Ground truth for the metric hooks
    #[arg(short, long)]
    label: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .with_line_number(verbose >= 3)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(verbose = cli.verbose, threads = cli.threads, "vsr started");
    trace!("args: {:?}", std::env::args().collect::<Vec<_>>());

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Psnr(args) => commands::psnr::run(args),
        Commands::Noise(args) => commands::noise::run(args, cli.verbose),
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::Decay(args) => commands::decay::run(args),
        Commands::Run(args) => commands::run::run(args, cli.verbose),
    }
}
