//! YAML preset files.
//!
//! A preset stores every setting of the compose and recover flows. Missing
//! keys take the application defaults, so a file can be as small as:
//!
//! ```yaml
//! grid:
//!   cell_size: 2
//! ```
//!
//! Full form:
//!
//! ```yaml
//! carrier:
//!   levels: { min: 25, max: 255 }
//! hidden:
//!   levels: { min: 0, max: 25 }
//! reveal:
//!   levels: null
//!   exposure: 2.0
//!   brightness: 80.0
//!   contrast: 100.0
//! grid:
//!   cell_size: 1
//!   parity: even
//! filter: bilinear
//! ```

use std::path::Path;

use mirage_ops::Preset;
use tracing::debug;

use crate::IoResult;

/// Parses and validates a preset from YAML text.
pub fn parse_preset(yaml: &str) -> IoResult<Preset> {
    let preset: Preset = serde_yaml::from_str(yaml)?;
    preset.validate()?;
    Ok(preset)
}

/// Loads a preset file.
///
/// # Errors
///
/// Fails on unreadable files, malformed YAML and values the engine rejects
/// (zero cell size, inverted levels, contrast out of range).
pub fn load_preset(path: impl AsRef<Path>) -> IoResult<Preset> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let preset = parse_preset(&content)?;
    debug!(path = %path.display(), ?preset, "loaded preset");
    Ok(preset)
}

/// Writes a preset file.
pub fn save_preset(path: impl AsRef<Path>, preset: &Preset) -> IoResult<()> {
    let yaml = serde_yaml::to_string(preset)?;
    std::fs::write(path, yaml)?;
    Ok(())
}
