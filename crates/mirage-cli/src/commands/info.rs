//! Image info command.
//!
//! Prints size, format and, with `-v`, luminance statistics.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mirage_ops::Histogram;

/// Arguments for the `info` command.
#[derive(Args)]
pub struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    pub input: Vec<PathBuf>,
}

/// Run the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for (i, path) in args.input.iter().enumerate() {
        if i > 0 {
            println!();
        }

        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let info = mirage_io::probe(path)
            .with_context(|| format!("Failed to read header: {}", path.display()))?;

        println!("{}", path.display());
        println!("  Format:     {}", info.format.name());
        println!("  Resolution: {}x{}", info.width, info.height);
        println!("  Pixels:     {}", info.width as u64 * info.height as u64);
        println!("  File size:  {}", super::format_size(file_size));

        if verbose > 0 {
            let image = super::load_image(path)?;
            let hist = Histogram::compute(&image);
            let opaque = image.pixels().filter(|(_, _, px)| px[3] == 255).count();
            if let Some(mean) = hist.mean() {
                println!("  Mean luma:  {:.1}", mean);
            }
            println!("  Opaque:     {}/{}", opaque, image.pixel_count());
        }
    }
    Ok(())
}
