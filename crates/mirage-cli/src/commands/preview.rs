//! Preview command.
//!
//! Brightens a composite with the reveal grade, without reconstruction.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirage_ops::pipeline::recovery_preview;

use super::{load_image, load_preset, save_image};

/// Arguments for the `preview` command.
#[derive(Args)]
pub struct PreviewArgs {
    /// Composite image
    pub input: PathBuf,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// YAML preset with default settings
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Exposure in stops (default 2)
    #[arg(long, allow_hyphen_values = true)]
    pub exposure: Option<f32>,

    /// Brightness offset (default 80)
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f32>,

    /// Contrast, -100..100 (default 100)
    #[arg(long, allow_hyphen_values = true)]
    pub contrast: Option<f32>,
}

/// Run the preview command.
pub fn run(args: PreviewArgs, verbose: u8) -> Result<()> {
    let mut reveal = load_preset(args.preset.as_deref())?.reveal;
    if let Some(v) = args.exposure {
        reveal.exposure = v;
    }
    if let Some(v) = args.brightness {
        reveal.brightness = v;
    }
    if let Some(v) = args.contrast {
        reveal.contrast = v;
    }

    let composite = load_image(&args.input)?;
    let preview = recovery_preview(&composite, &reveal).context("Preview failed")?;
    save_image(&args.output, &preview)?;

    if verbose > 0 {
        println!(
            "Preview {} -> {} (exposure {}, brightness {}, contrast {})",
            args.input.display(),
            args.output.display(),
            reveal.exposure,
            reveal.brightness,
            reveal.contrast
        );
    }
    Ok(())
}
