//! mirage - checkerboard image interleave CLI
//!
//! Hides one image in the alternate cells of another and recovers it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::compose::ComposeArgs;
use commands::decompose::DecomposeArgs;
use commands::grade::GradeArgs;
use commands::histogram::HistogramArgs;
use commands::info::InfoArgs;
use commands::preview::PreviewArgs;

#[derive(Parser)]
#[command(name = "mirage")]
#[command(author, version, about = "Checkerboard image interleave tool")]
#[command(long_about = "
Interleaves a carrier and a hidden image on a checkerboard grid, and
reconstructs the hidden image from a composite.

Examples:
  mirage compose surface.png inner.png -o tank.png
  mirage compose a.jpg b.jpg -o out.png --cell-size 2 --preview reveal.png
  mirage decompose tank.png -o inner.png
  mirage decompose tank.png -o raw.png --raw --hidden even
  mirage preview tank.png -o bright.png --exposure 1.5
  mirage grade in.png -o out.png --levels 0,25
  mirage histogram tank.png --bars 32
  mirage info a.png b.jpg
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade both images and interleave them on a checkerboard
    #[command(visible_alias = "c")]
    Compose(ComposeArgs),

    /// Reconstruct the hidden image from a composite
    #[command(visible_alias = "d", alias = "parse")]
    Decompose(DecomposeArgs),

    /// Brighten a composite to show what a viewer would see
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// Apply levels/exposure/brightness/contrast to one image
    #[command(visible_alias = "g")]
    Grade(GradeArgs),

    /// Print the luminance histogram
    #[command(visible_alias = "hist")]
    Histogram(HistogramArgs),

    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Sets up the global subscriber.
///
/// `RUST_LOG` wins over `-v`. The returned guard flushes the log file and
/// must live until exit.
fn init_logging(verbose: u8, log: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Compose(args) => commands::compose::run(args, cli.verbose),
        Commands::Decompose(args) => commands::decompose::run(args, cli.verbose),
        Commands::Preview(args) => commands::preview::run(args, cli.verbose),
        Commands::Grade(args) => commands::grade::run(args, cli.verbose),
        Commands::Histogram(args) => commands::histogram::run(args),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
