//! Pixel sample type and luminance.
//!
//! Samples are plain `[u8; 4]` arrays in R, G, B, A order. The engine does
//! simple RGB arithmetic only; there is no color space tracking.

/// One RGBA sample, each channel in `0..=255`.
pub type Rgba = [u8; 4];

/// Red luma coefficient (BT.601).
pub const LUMA_R: f64 = 0.299;
/// Green luma coefficient (BT.601).
pub const LUMA_G: f64 = 0.587;
/// Blue luma coefficient (BT.601).
pub const LUMA_B: f64 = 0.114;

/// Integer luminance of an RGB triple.
///
/// `round(0.299 R + 0.587 G + 0.114 B)`, which always lands in `0..=255`
/// because the coefficients sum to one.
///
/// # Example
///
/// ```rust
/// use mirage_core::luminance;
///
/// assert_eq!(luminance([255, 255, 255]), 255);
/// assert_eq!(luminance([0, 0, 0]), 0);
/// assert_eq!(luminance([255, 0, 0]), 76);
/// ```
#[inline]
pub fn luminance(rgb: [u8; 3]) -> u8 {
    let y = LUMA_R * rgb[0] as f64 + LUMA_G * rgb[1] as f64 + LUMA_B * rgb[2] as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Rounds and clamps a working value back to a channel.
///
/// NaN maps to zero.
#[inline]
pub fn to_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_primaries() {
        assert_eq!(luminance([255, 0, 0]), 76); // 76.245
        assert_eq!(luminance([0, 255, 0]), 150); // 149.685
        assert_eq!(luminance([0, 0, 255]), 29); // 29.07
    }

    #[test]
    fn test_luminance_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(luminance([v, v, v]), v);
        }
    }

    #[test]
    fn test_to_channel() {
        assert_eq!(to_channel(-12.0), 0);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(to_channel(127.4), 127);
        assert_eq!(to_channel(127.6), 128);
        assert_eq!(to_channel(f32::NAN), 0);
        assert_eq!(to_channel(f32::INFINITY), 255);
    }
}
