//! End-to-end flows built from the individual operations.
//!
//! - [`compose_images`]: grade both layers, size the hidden layer to the
//!   carrier, interleave
//! - [`recover_image`]: reconstruct the hidden layer, optionally re-grade it
//! - [`recovery_preview`]: brighten a composite without reconstruction
//!
//! [`Preset`] bundles every setting the flows take so it can be stored as a
//! YAML file.

use mirage_core::{GridSpec, Parity, PixelBuffer};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::OpsResult;
use crate::checker::compose;
use crate::decompose::decompose;
use crate::grade::{grade, graded, GradeOverrides, GradeSettings};
use crate::histogram::Histogram;
use crate::resize::{match_dimensions, Filter};

/// Settings for [`compose_images`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
    /// Grade applied to the carrier (surface) image.
    #[serde(deserialize_with = "carrier_grade")]
    pub carrier: GradeSettings,
    /// Grade applied to the hidden (inner) image.
    #[serde(deserialize_with = "hidden_grade")]
    pub hidden: GradeSettings,
    /// Checkerboard layout; the carrier takes the cells of `grid.parity`.
    pub grid: GridSpec,
    /// Filter used when the hidden image has to be resampled.
    pub filter: Filter,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            carrier: GradeSettings::carrier(),
            hidden: GradeSettings::hidden(),
            grid: GridSpec::default(),
            filter: Filter::default(),
        }
    }
}

/// Result of [`compose_images`].
#[derive(Debug, Clone)]
pub struct ComposeOutput {
    /// Interleaved image, carrier-sized.
    pub composite: PixelBuffer,
    /// Histogram of the graded carrier.
    pub carrier_histogram: Histogram,
    /// Histogram of the graded, resampled hidden layer.
    pub hidden_histogram: Histogram,
}

/// Grades both inputs, resamples the hidden layer and interleaves them.
///
/// Neither input is modified. The carrier's dimensions are authoritative:
/// the hidden image is always the one resampled, never the other way round.
/// Grading happens before resampling.
///
/// # Example
///
/// ```rust
/// use mirage_core::PixelBuffer;
/// use mirage_ops::pipeline::{compose_images, ComposeSettings};
///
/// let carrier = PixelBuffer::filled(8, 6, [255, 255, 255, 255]).unwrap();
/// let hidden = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
/// let out = compose_images(&carrier, &hidden, &ComposeSettings::default()).unwrap();
/// assert_eq!(out.composite.dimensions(), (8, 6));
/// ```
pub fn compose_images(
    carrier: &PixelBuffer,
    hidden: &PixelBuffer,
    settings: &ComposeSettings,
) -> OpsResult<ComposeOutput> {
    settings.grid.validate()?;
    settings.carrier.validate()?;
    settings.hidden.validate()?;

    debug!(
        carrier = ?carrier.dimensions(),
        hidden = ?hidden.dimensions(),
        cell_size = settings.grid.cell_size,
        parity = %settings.grid.parity,
        "compose_images"
    );

    let layer_a = graded(carrier, &settings.carrier)?;
    let layer_b = graded(hidden, &settings.hidden)?;
    let layer_b = match_dimensions(&layer_b, carrier.dimensions(), settings.filter)?;

    let carrier_histogram = Histogram::compute(&layer_a);
    let hidden_histogram = Histogram::compute(&layer_b);
    let composite = compose(layer_a, &layer_b, &settings.grid)?;

    info!(
        width = composite.width(),
        height = composite.height(),
        "composite ready"
    );
    Ok(ComposeOutput {
        composite,
        carrier_histogram,
        hidden_histogram,
    })
}

/// Settings for [`recover_image`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverSettings {
    /// Grid used when composing; only the cell size matters here.
    pub grid: GridSpec,
    /// Parity of the cells holding the hidden layer.
    pub hidden: Parity,
    /// Grade applied after reconstruction; `None` returns the raw estimate.
    #[serde(deserialize_with = "optional_reveal_grade")]
    pub reveal: Option<GradeSettings>,
}

impl Default for RecoverSettings {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            hidden: Parity::Odd,
            reveal: Some(GradeSettings::reveal()),
        }
    }
}

/// Result of [`recover_image`].
#[derive(Debug, Clone)]
pub struct RecoverOutput {
    /// Reconstructed (and possibly re-graded) hidden layer.
    pub image: PixelBuffer,
    /// Histogram of `image`.
    pub histogram: Histogram,
}

/// Reconstructs the hidden layer of a composite.
///
/// # Example
///
/// ```rust
/// use mirage_core::PixelBuffer;
/// use mirage_ops::pipeline::{recover_image, RecoverSettings};
///
/// let composite = PixelBuffer::filled(4, 4, [10, 10, 10, 255]).unwrap();
/// let out = recover_image(&composite, &RecoverSettings::default()).unwrap();
/// assert_eq!(out.histogram.total(), 16);
/// ```
pub fn recover_image(composite: &PixelBuffer, settings: &RecoverSettings) -> OpsResult<RecoverOutput> {
    if let Some(reveal) = &settings.reveal {
        reveal.validate()?;
    }

    let mut image = decompose(composite, &settings.grid, settings.hidden)?;
    if let Some(reveal) = &settings.reveal {
        grade(&mut image, reveal)?;
    }
    let histogram = Histogram::compute(&image);

    debug!(mean = ?histogram.mean(), "recovered");
    Ok(RecoverOutput { image, histogram })
}

/// Graded copy of a composite, showing what a brightened view reveals.
///
/// No reconstruction happens; this is [`graded`] under a name that matches
/// the flow.
pub fn recovery_preview(composite: &PixelBuffer, reveal: &GradeSettings) -> OpsResult<PixelBuffer> {
    graded(composite, reveal)
}

// A partial grade block keeps the defaults of its own slot for the keys it
// leaves out.
fn carrier_grade<'de, D: Deserializer<'de>>(d: D) -> Result<GradeSettings, D::Error> {
    GradeOverrides::deserialize(d).map(|o| o.over(GradeSettings::carrier()))
}

fn hidden_grade<'de, D: Deserializer<'de>>(d: D) -> Result<GradeSettings, D::Error> {
    GradeOverrides::deserialize(d).map(|o| o.over(GradeSettings::hidden()))
}

fn reveal_grade<'de, D: Deserializer<'de>>(d: D) -> Result<GradeSettings, D::Error> {
    GradeOverrides::deserialize(d).map(|o| o.over(GradeSettings::reveal()))
}

fn optional_reveal_grade<'de, D: Deserializer<'de>>(d: D) -> Result<Option<GradeSettings>, D::Error> {
    Option::<GradeOverrides>::deserialize(d).map(|o| o.map(|o| o.over(GradeSettings::reveal())))
}

/// Every setting of both flows, as stored in a preset file.
///
/// Missing fields take the application defaults. Inside a grade block, the
/// missing keys keep that slot's default: `carrier: { exposure: 0.5 }`
/// still has the carrier levels.
///
/// ```rust
/// use mirage_core::Parity;
/// use mirage_ops::pipeline::Preset;
///
/// let preset = Preset::default();
/// assert_eq!(preset.recover_settings().hidden, Parity::Odd);
/// assert_eq!(preset.compose_settings().carrier.levels.map(|l| l.min), Some(25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Carrier grade.
    #[serde(deserialize_with = "carrier_grade")]
    pub carrier: GradeSettings,
    /// Hidden-layer grade.
    #[serde(deserialize_with = "hidden_grade")]
    pub hidden: GradeSettings,
    /// Grade for recovery and preview.
    #[serde(deserialize_with = "reveal_grade")]
    pub reveal: GradeSettings,
    /// Checkerboard layout shared by compose and recover.
    pub grid: GridSpec,
    /// Resampling filter.
    pub filter: Filter,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            carrier: GradeSettings::carrier(),
            hidden: GradeSettings::hidden(),
            reveal: GradeSettings::reveal(),
            grid: GridSpec::default(),
            filter: Filter::default(),
        }
    }
}

impl Preset {
    /// Compose settings taken from this preset.
    pub fn compose_settings(&self) -> ComposeSettings {
        ComposeSettings {
            carrier: self.carrier,
            hidden: self.hidden,
            grid: self.grid,
            filter: self.filter,
        }
    }

    /// Recover settings; the hidden layer sits on the cells the carrier
    /// does not use.
    pub fn recover_settings(&self) -> RecoverSettings {
        RecoverSettings {
            grid: self.grid,
            hidden: self.grid.layer_b_parity(),
            reveal: Some(self.reveal),
        }
    }

    /// Validates every grade and the grid.
    pub fn validate(&self) -> OpsResult<()> {
        self.grid.validate()?;
        self.carrier.validate()?;
        self.hidden.validate()?;
        self.reveal.validate()
    }
}
