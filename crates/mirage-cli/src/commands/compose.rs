//! Compose command.
//!
//! Grades the carrier and hidden images, resamples the hidden one to the
//! carrier's size and interleaves them on a checkerboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirage_core::Parity;
use mirage_ops::pipeline::{compose_images, recovery_preview};
use mirage_ops::Filter;
use tracing::info;

use super::{load_image, load_preset, parse_levels, save_image};

/// Arguments for the `compose` command.
#[derive(Args)]
pub struct ComposeArgs {
    /// Carrier (surface) image; its size is kept
    pub carrier: PathBuf,

    /// Hidden (inner) image
    pub hidden: PathBuf,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// YAML preset with default settings
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Grid cell size in pixels
    #[arg(short = 's', long)]
    pub cell_size: Option<u32>,

    /// Cells that carry the carrier image: even or odd
    #[arg(long)]
    pub parity: Option<Parity>,

    /// Filter for resampling the hidden image
    #[arg(short, long)]
    pub filter: Option<Filter>,

    /// Carrier output levels (default 25,255)
    #[arg(long, value_name = "MIN,MAX", conflicts_with = "no_carrier_levels")]
    pub carrier_levels: Option<String>,

    /// Disable the carrier levels remap
    #[arg(long)]
    pub no_carrier_levels: bool,

    /// Hidden output levels (default 0,25)
    #[arg(long, value_name = "MIN,MAX", conflicts_with = "no_hidden_levels")]
    pub hidden_levels: Option<String>,

    /// Disable the hidden levels remap
    #[arg(long)]
    pub no_hidden_levels: bool,

    /// Also write a brightened preview of the composite
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,
}

/// Run the compose command.
pub fn run(args: ComposeArgs, verbose: u8) -> Result<()> {
    let preset = load_preset(args.preset.as_deref())?;
    let mut settings = preset.compose_settings();

    if let Some(cell_size) = args.cell_size {
        settings.grid.cell_size = cell_size;
    }
    if let Some(parity) = args.parity {
        settings.grid.parity = parity;
    }
    if let Some(filter) = args.filter {
        settings.filter = filter;
    }
    if let Some(levels) = &args.carrier_levels {
        settings.carrier.levels = Some(parse_levels(levels)?);
    }
    if args.no_carrier_levels {
        settings.carrier.levels = None;
    }
    if let Some(levels) = &args.hidden_levels {
        settings.hidden.levels = Some(parse_levels(levels)?);
    }
    if args.no_hidden_levels {
        settings.hidden.levels = None;
    }

    let carrier = load_image(&args.carrier)?;
    let hidden = load_image(&args.hidden)?;
    if !carrier.same_size(&hidden) {
        info!(
            from = ?hidden.dimensions(),
            to = ?carrier.dimensions(),
            filter = %settings.filter,
            "resampling hidden image"
        );
    }

    let out = compose_images(&carrier, &hidden, &settings).context("Compose failed")?;
    save_image(&args.output, &out.composite)?;

    if let Some(path) = &args.preview {
        let preview = recovery_preview(&out.composite, &preset.reveal).context("Preview failed")?;
        save_image(path, &preview)?;
    }

    if verbose > 0 {
        let (w, h) = out.composite.dimensions();
        println!(
            "Composed {} + {} -> {} ({}x{}, cell {}, carrier on {} cells)",
            args.carrier.display(),
            args.hidden.display(),
            args.output.display(),
            w,
            h,
            settings.grid.cell_size,
            settings.grid.parity
        );
        if let (Some(c), Some(hm)) = (out.carrier_histogram.mean(), out.hidden_histogram.mean()) {
            println!("  Mean luminance: carrier {:.1}, hidden {:.1}", c, hm);
        }
    }

    Ok(())
}
