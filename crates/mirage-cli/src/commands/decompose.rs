//! Decompose command.
//!
//! Rebuilds the hidden layer of a composite by averaging hidden-parity
//! neighbors, then brightens it with the reveal grade unless `--raw`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirage_core::Parity;
use mirage_ops::pipeline::recover_image;

use super::{load_image, load_preset, save_image};

/// Arguments for the `decompose` command.
#[derive(Args)]
pub struct DecomposeArgs {
    /// Composite image
    pub input: PathBuf,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// YAML preset with default settings
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Grid cell size used when composing
    #[arg(short = 's', long)]
    pub cell_size: Option<u32>,

    /// Cells holding the hidden image: odd or even (default: the ones the
    /// carrier does not use)
    #[arg(long)]
    pub hidden: Option<Parity>,

    /// Reveal exposure in stops (default 2)
    #[arg(long, allow_hyphen_values = true)]
    pub exposure: Option<f32>,

    /// Reveal brightness offset (default 80)
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f32>,

    /// Reveal contrast, -100..100 (default 100)
    #[arg(long, allow_hyphen_values = true)]
    pub contrast: Option<f32>,

    /// Skip the reveal grade and write the raw reconstruction
    #[arg(long, conflicts_with_all = ["exposure", "brightness", "contrast"])]
    pub raw: bool,
}

/// Run the decompose command.
pub fn run(args: DecomposeArgs, verbose: u8) -> Result<()> {
    let preset = load_preset(args.preset.as_deref())?;
    let mut settings = preset.recover_settings();

    if let Some(cell_size) = args.cell_size {
        settings.grid.cell_size = cell_size;
    }
    if let Some(hidden) = args.hidden {
        settings.hidden = hidden;
    }
    if args.raw {
        settings.reveal = None;
    } else if let Some(reveal) = settings.reveal.as_mut() {
        if let Some(v) = args.exposure {
            reveal.exposure = v;
        }
        if let Some(v) = args.brightness {
            reveal.brightness = v;
        }
        if let Some(v) = args.contrast {
            reveal.contrast = v;
        }
    }

    let composite = load_image(&args.input)?;
    let out = recover_image(&composite, &settings).context("Decompose failed")?;
    save_image(&args.output, &out.image)?;

    if verbose > 0 {
        println!(
            "Recovered {} -> {} (cell {}, hidden on {} cells{})",
            args.input.display(),
            args.output.display(),
            settings.grid.cell_size,
            settings.hidden,
            if settings.reveal.is_some() { ", revealed" } else { "" }
        );
        if let Some(mean) = out.histogram.mean() {
            println!("  Mean luminance: {:.1}", mean);
        }
    }

    Ok(())
}

