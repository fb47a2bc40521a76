//! Four-stage tone grading: levels, exposure, brightness, contrast.
//!
//! For every pixel and every color channel, in this fixed order:
//!
//! 1. **Levels** (optional): `v = clamp((v / 255) * (max - min) + min)`
//! 2. **Exposure**: `v *= 2^exposure`
//! 3. **Brightness**: `v += brightness`
//! 4. **Contrast**: `v = f * (v - 128) + 128` with
//!    `f = 259 (c + 255) / (255 (259 - c))`
//!
//! The result is clamped to `[0, 255]` and rounded to the nearest integer.
//! Alpha is never touched. Stages 2-4 work on unclamped floats; reordering
//! them changes the output.
//!
//! # Example
//!
//! ```rust
//! use mirage_core::PixelBuffer;
//! use mirage_ops::grade::{grade, GradeSettings};
//!
//! let mut buf = PixelBuffer::filled(2, 2, [100, 100, 100, 255]).unwrap();
//! let settings = GradeSettings { brightness: 20.0, ..GradeSettings::identity() };
//! grade(&mut buf, &settings).unwrap();
//! assert_eq!(buf.pixel(0, 0), [120, 120, 120, 255]);
//! ```

use mirage_core::PixelBuffer;
use mirage_core::pixel::to_channel;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// Lowest accepted contrast value.
pub const MIN_CONTRAST: f32 = -100.0;

/// Highest accepted contrast value. The formula diverges at 259.
pub const MAX_CONTRAST: f32 = 100.0;

/// Pivot of the contrast curve.
pub const CONTRAST_PIVOT: f32 = 128.0;

/// Output range for the levels stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Levels {
    /// Output value for input 0.
    pub min: u8,
    /// Output value for input 255. Must exceed `min`.
    pub max: u8,
}

impl Levels {
    /// Creates levels without validation.
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Builds levels that always satisfy `min < max`.
    ///
    /// `min` is pulled down to `max - 1` and `max` pushed up to `min + 1`
    /// when they collide, the way slider pairs keep one step apart.
    ///
    /// ```rust
    /// use mirage_ops::grade::Levels;
    ///
    /// assert_eq!(Levels::clamped(40, 40), Levels::new(39, 40));
    /// assert_eq!(Levels::clamped(0, 0), Levels::new(0, 1));
    /// ```
    pub fn clamped(min: u8, max: u8) -> Self {
        if min < max {
            Self { min, max }
        } else if max > 0 {
            Self { min: max - 1, max }
        } else {
            Self { min: 0, max: 1 }
        }
    }

    /// Remaps one channel value into `[min, max]`.
    #[inline]
    pub fn apply(&self, v: f32) -> f32 {
        let span = self.max as f32 - self.min as f32;
        ((v / 255.0) * span + self.min as f32).clamp(0.0, 255.0)
    }
}

/// Grading parameters for one layer.
///
/// `levels: None` is the exposure/brightness/contrast-only variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeSettings {
    /// Optional output levels remap.
    pub levels: Option<Levels>,
    /// Exposure in stops, typically -2..2.
    pub exposure: f32,
    /// Additive offset, typically -100..100.
    pub brightness: f32,
    /// Contrast, accepted range -100..100.
    pub contrast: f32,
}

impl Default for GradeSettings {
    fn default() -> Self {
        Self::identity()
    }
}

/// Grade fields as written in a settings file; absent keys stay `None`.
///
/// `levels: null` is kept apart from a missing `levels` key so a file can
/// switch the levels stage off for a slot whose default has one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GradeOverrides {
    #[serde(deserialize_with = "present")]
    levels: Option<Option<Levels>>,
    exposure: Option<f32>,
    brightness: Option<f32>,
    contrast: Option<f32>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl GradeOverrides {
    /// Applies the given keys on top of `base`.
    pub(crate) fn over(self, base: GradeSettings) -> GradeSettings {
        GradeSettings {
            levels: self.levels.unwrap_or(base.levels),
            exposure: self.exposure.unwrap_or(base.exposure),
            brightness: self.brightness.unwrap_or(base.brightness),
            contrast: self.contrast.unwrap_or(base.contrast),
        }
    }
}

impl GradeSettings {
    /// No-op settings.
    pub const fn identity() -> Self {
        Self {
            levels: None,
            exposure: 0.0,
            brightness: 0.0,
            contrast: 0.0,
        }
    }

    /// Default carrier grade: output levels 25..255 lift the blacks so the
    /// carrier stays visible on light backgrounds.
    pub const fn carrier() -> Self {
        Self {
            levels: Some(Levels::new(25, 255)),
            ..Self::identity()
        }
    }

    /// Default hidden-layer grade: output levels 0..25 crush the hidden
    /// image into near-black.
    pub const fn hidden() -> Self {
        Self {
            levels: Some(Levels::new(0, 25)),
            ..Self::identity()
        }
    }

    /// Aggressive grade that brings crushed hidden content back into view.
    pub const fn reveal() -> Self {
        Self {
            levels: None,
            exposure: 2.0,
            brightness: 80.0,
            contrast: 100.0,
        }
    }

    /// Returns `true` if grading with these settings changes nothing.
    pub fn is_identity(&self) -> bool {
        self.levels.is_none()
            && self.exposure == 0.0
            && self.brightness == 0.0
            && self.contrast == 0.0
    }

    /// Checks that the settings produce finite output.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidGradeParameters`] for non-finite values, contrast
    /// outside [`MIN_CONTRAST`]..=[`MAX_CONTRAST`], or `levels.min >= levels.max`.
    pub fn validate(&self) -> OpsResult<()> {
        for (name, v) in [
            ("exposure", self.exposure),
            ("brightness", self.brightness),
            ("contrast", self.contrast),
        ] {
            if !v.is_finite() {
                return Err(OpsError::InvalidGradeParameters(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if !(MIN_CONTRAST..=MAX_CONTRAST).contains(&self.contrast) {
            return Err(OpsError::InvalidGradeParameters(format!(
                "contrast {} outside {}..={}",
                self.contrast, MIN_CONTRAST, MAX_CONTRAST
            )));
        }
        if let Some(levels) = self.levels {
            if levels.min >= levels.max {
                return Err(OpsError::InvalidGradeParameters(format!(
                    "levels min {} must be below max {}",
                    levels.min, levels.max
                )));
            }
        }
        if !2.0f32.powf(self.exposure).is_finite() {
            return Err(OpsError::InvalidGradeParameters(format!(
                "exposure {} overflows",
                self.exposure
            )));
        }
        Ok(())
    }

    /// Contrast slope around [`CONTRAST_PIVOT`].
    #[inline]
    pub fn contrast_factor(&self) -> f32 {
        (259.0 * (self.contrast + 255.0)) / (255.0 * (259.0 - self.contrast))
    }

    /// Precomputes the per-pixel constants.
    fn kernel(&self) -> GradeKernel {
        GradeKernel {
            levels: self.levels,
            gain: 2.0f32.powf(self.exposure),
            offset: self.brightness,
            factor: self.contrast_factor(),
        }
    }
}

/// Settings with the transcendental parts already evaluated.
#[derive(Debug, Clone, Copy)]
struct GradeKernel {
    levels: Option<Levels>,
    gain: f32,
    offset: f32,
    factor: f32,
}

impl GradeKernel {
    #[inline]
    fn channel(&self, v: u8) -> u8 {
        let mut v = v as f32;
        if let Some(levels) = self.levels {
            v = levels.apply(v);
        }
        v *= self.gain;
        v += self.offset;
        v = self.factor * (v - CONTRAST_PIVOT) + CONTRAST_PIVOT;
        to_channel(v)
    }

    /// Builds a 256-entry lookup table; each channel depends only on its
    /// own input value.
    fn table(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (i, out) in lut.iter_mut().enumerate() {
            *out = self.channel(i as u8);
        }
        lut
    }
}

/// Grades one channel value.
///
/// ```rust
/// use mirage_ops::grade::{grade_value, GradeSettings};
///
/// assert_eq!(grade_value(128, &GradeSettings::reveal()), 255);
/// assert_eq!(grade_value(77, &GradeSettings::identity()), 77);
/// ```
pub fn grade_value(v: u8, settings: &GradeSettings) -> u8 {
    settings.kernel().channel(v)
}

/// Grades a buffer in place.
///
/// # Errors
///
/// Returns [`OpsError::InvalidGradeParameters`] if the settings fail
/// [`GradeSettings::validate`]; the buffer is untouched in that case.
pub fn grade(buffer: &mut PixelBuffer, settings: &GradeSettings) -> OpsResult<()> {
    settings.validate()?;
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        levels = ?settings.levels,
        exposure = settings.exposure,
        brightness = settings.brightness,
        contrast = settings.contrast,
        "grade"
    );

    if settings.is_identity() {
        trace!("identity grade, skipping");
        return Ok(());
    }

    let lut = settings.kernel().table();
    let row_len = buffer.row_len();
    for_each_row(buffer.data_mut(), row_len, |_, row| {
        for px in row.chunks_exact_mut(4) {
            px[0] = lut[px[0] as usize];
            px[1] = lut[px[1] as usize];
            px[2] = lut[px[2] as usize];
        }
    });
    Ok(())
}

/// Returns a graded copy, leaving the source untouched.
pub fn graded(buffer: &PixelBuffer, settings: &GradeSettings) -> OpsResult<PixelBuffer> {
    let mut out = buffer.clone();
    grade(&mut out, settings)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient() -> PixelBuffer {
        let mut buf = PixelBuffer::new(256, 1).unwrap();
        for x in 0..256u32 {
            let v = x as u8;
            buf.set_pixel(x, 0, [v, 255 - v, v / 2, (x % 7) as u8]);
        }
        buf
    }

    #[test]
    fn test_identity_leaves_pixels() {
        let src = gradient();
        let mut out = src.clone();
        grade(&mut out, &GradeSettings::identity()).unwrap();
        assert_eq!(out, src);

        // Same result through the full kernel, not the shortcut
        for v in 0..=255u8 {
            assert_eq!(GradeSettings::identity().kernel().channel(v), v);
        }
    }

    #[test]
    fn test_contrast_pivot() {
        let settings = GradeSettings::identity();
        assert_relative_eq!(settings.contrast_factor(), 1.0);
        assert_eq!(grade_value(128, &settings), 128);

        // 128 is a fixed point of the contrast stage for any contrast
        for c in [-100.0, -50.0, 25.0, 100.0] {
            let s = GradeSettings { contrast: c, ..GradeSettings::identity() };
            assert_eq!(grade_value(128, &s), 128);
        }
    }

    #[test]
    fn test_levels_remap() {
        let s = GradeSettings::hidden(); // 0..25
        assert_eq!(grade_value(0, &s), 0);
        assert_eq!(grade_value(255, &s), 25);
        assert_eq!(grade_value(102, &s), 10); // 102/255*25 = 10.0

        let s = GradeSettings::carrier(); // 25..255
        assert_eq!(grade_value(0, &s), 25);
        assert_eq!(grade_value(255, &s), 255);
    }

    #[test]
    fn test_levels_monotonic_in_max() {
        for v in 0..=255u8 {
            let mut prev = 0u8;
            for max in 1..=255u8 {
                let s = GradeSettings {
                    levels: Some(Levels::new(0, max)),
                    ..GradeSettings::identity()
                };
                let out = grade_value(v, &s);
                assert!(out >= prev, "v={v} max={max}: {out} < {prev}");
                prev = out;
            }
        }
    }

    #[test]
    fn test_stage_order() {
        // exposure before brightness: (50 * 2) + 10 = 110, not (50 + 10) * 2
        let s = GradeSettings {
            exposure: 1.0,
            brightness: 10.0,
            ..GradeSettings::identity()
        };
        assert_eq!(grade_value(50, &s), 110);

        // levels clamp happens before exposure, contrast after brightness
        let s = GradeSettings {
            levels: Some(Levels::new(0, 100)),
            exposure: 1.0,
            brightness: -72.0,
            contrast: 50.0,
        };
        // 255 -> 100 -> 200 -> 128 -> pivot
        assert_eq!(grade_value(255, &s), 128);
    }

    #[test]
    fn test_reveal_brightens_dark_content() {
        let s = GradeSettings::reveal();
        // 10 -> 40 -> 120 -> f*(120-128)+128 with f ~ 2.27
        let expected = (s.contrast_factor() * (120.0 - 128.0) + 128.0).round() as u8;
        assert_eq!(expected, 110);
        assert_eq!(grade_value(10, &s), expected);
        assert_eq!(grade_value(0, &s), 19);
        assert_eq!(grade_value(200, &s), 255);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut buf = gradient();
        let alphas: Vec<u8> = buf.pixels().map(|(_, _, px)| px[3]).collect();
        grade(&mut buf, &GradeSettings::reveal()).unwrap();
        let after: Vec<u8> = buf.pixels().map(|(_, _, px)| px[3]).collect();
        assert_eq!(alphas, after);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let mut buf = gradient();
        let before = buf.clone();

        let s = GradeSettings { contrast: 259.0, ..GradeSettings::identity() };
        assert!(grade(&mut buf, &s).unwrap_err().is_invalid_grade());

        let s = GradeSettings { contrast: f32::NAN, ..GradeSettings::identity() };
        assert!(s.validate().unwrap_err().is_invalid_grade());

        let s = GradeSettings { exposure: 500.0, ..GradeSettings::identity() };
        assert!(s.validate().is_err());

        let s = GradeSettings {
            levels: Some(Levels::new(30, 30)),
            ..GradeSettings::identity()
        };
        assert!(grade(&mut buf, &s).unwrap_err().is_invalid_grade());

        assert_eq!(buf, before);
    }

    #[test]
    fn test_graded_copy() {
        let src = PixelBuffer::filled(3, 3, [40, 40, 40, 255]).unwrap();
        let out = graded(&src, &GradeSettings::reveal()).unwrap();
        assert_eq!(src.pixel(0, 0), [40, 40, 40, 255]);
        assert_ne!(out.pixel(0, 0), [40, 40, 40, 255]);
    }

    #[test]
    fn test_levels_clamped() {
        assert_eq!(Levels::clamped(10, 200), Levels::new(10, 200));
        assert_eq!(Levels::clamped(200, 10), Levels::new(9, 10));
        assert_eq!(Levels::clamped(255, 255), Levels::new(254, 255));
    }
}
