//! Image resampling.
//!
//! Separable two-pass resize over RGBA8 buffers: a horizontal pass into an
//! `f32` scratch raster, then a vertical pass that rounds back to `u8`. All
//! four channels are filtered independently; alpha is not premultiplied.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - No interpolation (blocky)
//! - [`Filter::Bilinear`] - Triangle filter, the default
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - Windowed sinc, sharpest on downscale
//!
//! # Example
//!
//! ```rust
//! use mirage_core::PixelBuffer;
//! use mirage_ops::resize::{resize, Filter};
//!
//! let src = PixelBuffer::filled(16, 16, [40, 80, 120, 255]).unwrap();
//! let dst = resize(&src, 32, 8, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.dimensions(), (32, 8));
//! assert_eq!(dst.pixel(5, 5), [40, 80, 120, 255]);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use mirage_core::pixel::to_channel;
use mirage_core::{Error, PixelBuffer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::OpsResult;
use crate::parallel::{for_each_row, map_rows};

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Bicubic (Mitchell-Netravali, B = C = 1/3).
    Bicubic,
    /// Lanczos with a = 3.
    Lanczos3,
}

impl Filter {
    /// Support radius in source pixels at 1:1 scale.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the kernel at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => nearest_weight(x),
            Filter::Bilinear => bilinear_weight(x),
            Filter::Bicubic => bicubic_weight(x),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Bicubic => "bicubic",
            Filter::Lanczos3 => "lanczos3",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "point" => Ok(Filter::Nearest),
            "bilinear" | "linear" | "triangle" => Ok(Filter::Bilinear),
            "bicubic" | "cubic" | "mitchell" => Ok(Filter::Bicubic),
            "lanczos3" | "lanczos" => Ok(Filter::Lanczos3),
            other => Err(format!(
                "unknown filter '{other}' (expected nearest, bilinear, bicubic or lanczos3)"
            )),
        }
    }
}

/// Box kernel, support 0.5.
#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

/// Triangle (tent) kernel, support 1.
#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Mitchell-Netravali cubic with B = C = 1/3, support 2.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

/// Windowed sinc with `a` lobes.
#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized source taps for one destination sample.
#[derive(Debug)]
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Precomputes the taps for every destination index along one axis.
fn taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;
    let last = src_len as isize - 1;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).clamp(0, last);
            let right = ((center + support).ceil() as isize).clamp(0, last);

            let mut weights: Vec<f32> = (left..=right)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();

            if sum.abs() > f32::EPSILON {
                for w in &mut weights {
                    *w /= sum;
                }
                Taps {
                    start: left as usize,
                    weights,
                }
            } else {
                // Sample fell between kernel zeros: take the closest pixel.
                let nearest = (center.round() as isize).clamp(0, last);
                Taps {
                    start: nearest as usize,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

/// Resamples a buffer to `width x height`.
///
/// A same-size request returns an unfiltered copy.
///
/// # Errors
///
/// Returns an empty-buffer error if either target dimension is zero.
pub fn resize(src: &PixelBuffer, width: u32, height: u32, filter: Filter) -> OpsResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(Error::empty_buffer(width, height).into());
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }

    debug!(
        from = ?src.dimensions(),
        to = ?(width, height),
        %filter,
        "resize"
    );

    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let (dst_w, dst_h) = (width as usize, height as usize);

    // Horizontal pass: src_h rows of dst_w pixels.
    let h_taps = taps(src_w, dst_w, filter);
    let scratch: Vec<Vec<f32>> = map_rows(src.data(), src.row_len(), |_, row| {
        let mut out = vec![0.0f32; dst_w * 4];
        for (x, tap) in h_taps.iter().enumerate() {
            let acc = &mut out[x * 4..x * 4 + 4];
            for (k, &w) in tap.weights.iter().enumerate() {
                let s = (tap.start + k) * 4;
                for c in 0..4 {
                    acc[c] += row[s + c] as f32 * w;
                }
            }
        }
        out
    });

    // Vertical pass straight into the output rows.
    let v_taps = taps(src_h, dst_h, filter);
    let mut dst = PixelBuffer::new(width, height)?;
    let row_len = dst.row_len();
    for_each_row(dst.data_mut(), row_len, |y, row| {
        let tap = &v_taps[y];
        for (i, out) in row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &w) in tap.weights.iter().enumerate() {
                acc += scratch[tap.start + k][i] * w;
            }
            *out = to_channel(acc);
        }
    });

    Ok(dst)
}

/// Brings `buffer` to exactly `(width, height)`.
///
/// Borrows the input when it already matches, otherwise resamples with
/// `filter`. This is the one-directional step that sizes the hidden layer
/// to the carrier before compositing; aspect ratio is not preserved.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use mirage_core::PixelBuffer;
/// use mirage_ops::resize::{match_dimensions, Filter};
///
/// let hidden = PixelBuffer::new(8, 8).unwrap();
/// assert!(matches!(match_dimensions(&hidden, (8, 8), Filter::default()).unwrap(), Cow::Borrowed(_)));
/// assert_eq!(match_dimensions(&hidden, (4, 6), Filter::default()).unwrap().dimensions(), (4, 6));
/// ```
pub fn match_dimensions(
    buffer: &PixelBuffer,
    (width, height): (u32, u32),
    filter: Filter,
) -> OpsResult<Cow<'_, PixelBuffer>> {
    if buffer.dimensions() == (width, height) {
        return Ok(Cow::Borrowed(buffer));
    }
    resize(buffer, width, height, filter).map(Cow::Owned)
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_filter_weights() {
        assert_relative_eq!(Filter::Nearest.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Nearest.weight(0.6), 0.0);
        assert_relative_eq!(Filter::Bilinear.weight(0.5), 0.5);
        assert_relative_eq!(Filter::Lanczos3.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Lanczos3.weight(3.5), 0.0);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("Lanczos".parse::<Filter>().unwrap(), Filter::Lanczos3);
        assert_eq!("linear".parse::<Filter>().unwrap(), Filter::Bilinear);
        assert!("gaussian".parse::<Filter>().is_err());
        assert_eq!(Filter::Bicubic.to_string(), "bicubic");
    }

    #[test]
    fn test_constant_stays_constant() {
        let src = PixelBuffer::filled(5, 7, [33, 66, 99, 200]).unwrap();
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Bicubic, Filter::Lanczos3] {
            for (w, h) in [(10, 14), (2, 3), (1, 1), (13, 4)] {
                let dst = resize(&src, w, h, filter).unwrap();
                assert_eq!(dst.dimensions(), (w, h));
                assert!(
                    dst.pixels().all(|(_, _, px)| px == [33, 66, 99, 200]),
                    "{filter} {w}x{h}"
                );
            }
        }
    }

    #[test]
    fn test_same_size_is_copy() {
        let mut src = PixelBuffer::new(3, 3).unwrap();
        src.set_pixel(1, 1, [255, 0, 0, 255]);
        let dst = resize(&src, 3, 3, Filter::Lanczos3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_nearest_upscale_replicates() {
        let mut src = PixelBuffer::new(2, 1).unwrap();
        src.set_pixel(0, 0, [10, 10, 10, 255]);
        src.set_pixel(1, 0, [90, 90, 90, 255]);
        let dst = resize(&src, 4, 1, Filter::Nearest).unwrap();
        let xs: Vec<u8> = (0..4).map(|x| dst.pixel(x, 0)[0]).collect();
        assert_eq!(xs, vec![10, 10, 90, 90]);
    }

    #[test]
    fn test_bilinear_downscale_averages() {
        let mut src = PixelBuffer::new(2, 2).unwrap();
        src.set_pixel(0, 0, [0, 0, 0, 255]);
        src.set_pixel(1, 0, [100, 100, 100, 255]);
        src.set_pixel(0, 1, [0, 0, 0, 255]);
        src.set_pixel(1, 1, [100, 100, 100, 255]);
        let dst = resize(&src, 1, 1, Filter::Bilinear).unwrap();
        assert_eq!(dst.pixel(0, 0), [50, 50, 50, 255]);
    }

    #[test]
    fn test_rejects_zero_target() {
        let src = PixelBuffer::new(4, 4).unwrap();
        assert!(resize(&src, 0, 4, Filter::Bilinear).unwrap_err().is_empty_buffer());
        assert!(resize(&src, 0, 0, Filter::Nearest).unwrap_err().is_empty_buffer());
        assert!(match_dimensions(&src, (4, 0), Filter::Bilinear).unwrap_err().is_empty_buffer());
    }
}
