//! Grade command.
//!
//! Applies levels, exposure, brightness and contrast to a single image, in
//! that order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirage_ops::grade::{grade, GradeSettings};

use super::{load_image, parse_levels, save_image};

/// Arguments for the `grade` command.
#[derive(Args)]
pub struct GradeArgs {
    /// Input image
    pub input: PathBuf,

    /// Output image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output levels MIN,MAX (off by default)
    #[arg(long, value_name = "MIN,MAX")]
    pub levels: Option<String>,

    /// Exposure in stops
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub exposure: f32,

    /// Brightness offset
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub brightness: f32,

    /// Contrast, -100..100
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub contrast: f32,
}

/// Run the grade command.
pub fn run(args: GradeArgs, verbose: u8) -> Result<()> {
    let settings = GradeSettings {
        levels: args.levels.as_deref().map(parse_levels).transpose()?,
        exposure: args.exposure,
        brightness: args.brightness,
        contrast: args.contrast,
    };

    let mut image = load_image(&args.input)?;
    grade(&mut image, &settings).context("Grade failed")?;
    save_image(&args.output, &image)?;

    if verbose > 0 {
        println!("Graded {} -> {}", args.input.display(), args.output.display());
        if let Some(levels) = settings.levels {
            println!("  Levels:     {}..{}", levels.min, levels.max);
        }
        println!("  Exposure:   {}", settings.exposure);
        println!("  Brightness: {}", settings.brightness);
        println!("  Contrast:   {}", settings.contrast);
    }
    Ok(())
}
