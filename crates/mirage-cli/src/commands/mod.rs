//! CLI command implementations

pub mod compose;
pub mod decompose;
pub mod grade;
pub mod histogram;
pub mod info;
pub mod preview;

use anyhow::{bail, Context, Result};
use mirage_core::PixelBuffer;
use mirage_ops::{Levels, Preset};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    mirage_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    mirage_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Load a preset file, or the built-in defaults when none is given.
pub fn load_preset(path: Option<&Path>) -> Result<Preset> {
    match path {
        Some(path) => mirage_io::preset::load_preset(path)
            .with_context(|| format!("Failed to load preset: {}", path.display())),
        None => Ok(Preset::default()),
    }
}

/// Parse a `MIN,MAX` levels pair.
pub fn parse_levels(s: &str) -> Result<Levels> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        bail!("Expected MIN,MAX levels, got '{}'", s);
    }
    let min: u8 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid levels minimum '{}'", parts[0].trim()))?;
    let max: u8 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid levels maximum '{}'", parts[1].trim()))?;
    if min >= max {
        bail!("Levels minimum ({}) must be below maximum ({})", min, max);
    }
    Ok(Levels::new(min, max))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
