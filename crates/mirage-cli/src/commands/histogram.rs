//! Histogram command.
//!
//! Prints the 256-bin luminance histogram as text bars or JSON.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use mirage_ops::Histogram;

use super::load_image;

/// Width of the longest text bar.
const BAR_WIDTH: usize = 50;

/// Arguments for the `histogram` command.
#[derive(Args)]
pub struct HistogramArgs {
    /// Input image
    pub input: PathBuf,

    /// Print JSON instead of bars
    #[arg(long)]
    pub json: bool,

    /// Number of text bars (divides 256)
    #[arg(long, default_value = "32")]
    pub bars: usize,
}

/// Sums adjacent bins into `n` groups.
fn group_bins(hist: &Histogram, n: usize) -> Vec<u64> {
    let step = hist.bins().len() / n;
    hist.bins()
        .chunks(step)
        .map(|c| c.iter().map(|&v| v as u64).sum())
        .collect()
}

/// Run the histogram command.
pub fn run(args: HistogramArgs) -> Result<()> {
    if args.bars == 0 || 256 % args.bars != 0 {
        bail!("--bars must divide 256, got {}", args.bars);
    }

    let image = load_image(&args.input)?;
    let hist = Histogram::compute(&image);

    if args.json {
        let doc = serde_json::json!({
            "file": args.input.display().to_string(),
            "width": image.width(),
            "height": image.height(),
            "total": hist.total(),
            "mean": hist.mean(),
            "bins": hist.bins().to_vec(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let groups = group_bins(&hist, args.bars);
    let max = groups.iter().copied().max().unwrap_or(0).max(1);
    let step = 256 / args.bars;

    println!("{} ({}x{})", args.input.display(), image.width(), image.height());
    for (i, &count) in groups.iter().enumerate() {
        let len = (count as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
        println!(
            "{:>3}-{:<3} {:<width$} {}",
            i * step,
            (i + 1) * step - 1,
            "#".repeat(len),
            count,
            width = BAR_WIDTH
        );
    }
    if let Some(mean) = hist.mean() {
        println!("mean {:.1}", mean);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::PixelBuffer;

    #[test]
    fn test_group_bins() {
        let mut buf = PixelBuffer::filled(4, 1, [0, 0, 0, 255]).unwrap();
        buf.set_pixel(3, 0, [255, 255, 255, 255]);
        let hist = Histogram::compute(&buf);

        let groups = group_bins(&hist, 4);
        assert_eq!(groups, vec![3, 0, 0, 1]);
        assert_eq!(group_bins(&hist, 256).len(), 256);
        assert_eq!(group_bins(&hist, 1), vec![4]);
    }
}
