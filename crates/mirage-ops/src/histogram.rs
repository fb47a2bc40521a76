//! 256-bin luminance histogram.
//!
//! Bin `i` counts the pixels whose [`luminance`] equals `i`. The histogram is
//! recomputed from scratch on every call; it is a diagnostic for display and
//! plays no part in the other operations.

use mirage_core::{luminance, PixelBuffer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parallel::map_rows;

/// Number of bins.
pub const BINS: usize = 256;

/// Luminance histogram of a buffer.
///
/// # Example
///
/// ```rust
/// use mirage_core::PixelBuffer;
/// use mirage_ops::histogram::Histogram;
///
/// let buf = PixelBuffer::filled(4, 4, [255, 255, 255, 255]).unwrap();
/// let hist = Histogram::compute(&buf);
/// assert_eq!(hist.bins()[255], 16);
/// assert_eq!(hist.total(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(with = "bins_serde")]
    bins: [u32; BINS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self { bins: [0; BINS] }
    }
}

impl Histogram {
    /// Computes the histogram in one pass over the buffer.
    pub fn compute(buffer: &PixelBuffer) -> Self {
        debug!(width = buffer.width(), height = buffer.height(), "histogram");

        let partials = map_rows(buffer.data(), buffer.row_len(), |_, row| {
            let mut bins = [0u32; BINS];
            for px in row.chunks_exact(4) {
                bins[luminance([px[0], px[1], px[2]]) as usize] += 1;
            }
            bins
        });

        let mut bins = [0u32; BINS];
        for partial in partials {
            for (acc, v) in bins.iter_mut().zip(partial) {
                *acc += v;
            }
        }
        Self { bins }
    }

    /// Raw bin counts.
    #[inline]
    pub fn bins(&self) -> &[u32; BINS] {
        &self.bins
    }

    /// Sum of all bins; equals the pixel count of the source buffer.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&v| v as u64).sum()
    }

    /// Count of the fullest bin.
    pub fn max_count(&self) -> u32 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Returns `true` if every bin is zero.
    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(|&v| v == 0)
    }

    /// Mean luminance, or `None` for an empty histogram.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let sum: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &v)| i as f64 * v as f64)
            .sum();
        Some(sum / total as f64)
    }

    /// Bar heights scaled so the fullest bin is `height` tall.
    ///
    /// ```rust
    /// use mirage_core::PixelBuffer;
    /// use mirage_ops::histogram::Histogram;
    ///
    /// let mut buf = PixelBuffer::filled(2, 1, [0, 0, 0, 255]).unwrap();
    /// buf.set_pixel(1, 0, [255, 255, 255, 255]);
    /// let bars = Histogram::compute(&buf).normalized(50.0);
    /// assert_eq!(bars[0], 50.0);
    /// assert_eq!(bars[255], 50.0);
    /// assert_eq!(bars[128], 0.0);
    /// ```
    pub fn normalized(&self, height: f32) -> Vec<f32> {
        let max = self.max_count();
        if max == 0 {
            return vec![0.0; BINS];
        }
        self.bins
            .iter()
            .map(|&v| v as f32 / max as f32 * height)
            .collect()
    }
}

/// Serde arrays are capped at 32 elements; go through a slice instead.
mod bins_serde {
    use super::BINS;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bins: &[u32; BINS], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(bins.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u32; BINS], D::Error> {
        let v = Vec::<u32>::deserialize(d)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 histogram bins"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_matches_pixel_count() {
        for (w, h) in [(1, 1), (7, 3), (64, 33)] {
            let mut buf = PixelBuffer::new(w, h).unwrap();
            buf.map_pixels(|_| [0, 0, 0, 255]);
            for y in 0..h {
                for x in 0..w {
                    let v = ((x * 31 + y * 17) % 256) as u8;
                    buf.set_pixel(x, y, [v, v.wrapping_mul(3), 255 - v, 255]);
                }
            }
            let hist = Histogram::compute(&buf);
            assert_eq!(hist.total(), (w * h) as u64);
        }
    }

    #[test]
    fn test_luma_bins() {
        let mut buf = PixelBuffer::new(3, 1).unwrap();
        buf.set_pixel(0, 0, [255, 0, 0, 255]);
        buf.set_pixel(1, 0, [0, 255, 0, 255]);
        buf.set_pixel(2, 0, [0, 0, 255, 0]);
        let hist = Histogram::compute(&buf);
        assert_eq!(hist.bins()[76], 1);
        assert_eq!(hist.bins()[150], 1);
        assert_eq!(hist.bins()[29], 1);
        assert_eq!(hist.max_count(), 1);
    }

    #[test]
    fn test_alpha_ignored() {
        let a = PixelBuffer::filled(2, 2, [90, 90, 90, 0]).unwrap();
        let b = PixelBuffer::filled(2, 2, [90, 90, 90, 255]).unwrap();
        assert_eq!(Histogram::compute(&a), Histogram::compute(&b));
    }

    #[test]
    fn test_stats() {
        let mut buf = PixelBuffer::filled(4, 1, [10, 10, 10, 255]).unwrap();
        buf.set_pixel(3, 0, [50, 50, 50, 255]);
        let hist = Histogram::compute(&buf);
        assert_eq!(hist.mean(), Some(20.0));
        assert!(!hist.is_empty());
        assert!(Histogram::default().is_empty());
        assert_eq!(Histogram::default().mean(), None);
        assert!(Histogram::default().normalized(10.0).iter().all(|&v| v == 0.0));
    }
}
