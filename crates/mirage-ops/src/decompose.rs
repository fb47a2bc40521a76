//! Hidden-layer reconstruction from a checkerboard composite.
//!
//! Pixels whose cell has the hidden parity are copied through. Every other
//! pixel is replaced by the rounded mean RGB of the hidden-parity pixels in
//! the square window `[x - r, x + r] x [y - r, y + r]` (clipped to the
//! image), where `r` is the grid's cell size. A pixel with no hidden-parity
//! neighbor in range keeps its composite value. Alpha is always copied.
//!
//! The result is an approximation: visible cells come back as a local blur
//! of the hidden content around them.
//!
//! # Cost
//!
//! The window grows with the cell size on both axes. Window sums are built
//! from per-row column sums plus a horizontal prefix, so the work is
//! `O(width * height * (2r + 1))`; very large cells on large images are
//! still slow and callers should pick sensible sizes.
//!
//! # Example
//!
//! ```rust
//! use mirage_core::{GridSpec, Parity, PixelBuffer};
//! use mirage_ops::{checker::compose, decompose::decompose};
//!
//! let a = PixelBuffer::filled(4, 4, [200, 0, 0, 255]).unwrap();
//! let b = PixelBuffer::filled(4, 4, [0, 0, 200, 255]).unwrap();
//! let grid = GridSpec::default();
//! let composite = compose(a, &b, &grid).unwrap();
//!
//! let hidden = decompose(&composite, &grid, grid.layer_b_parity()).unwrap();
//! assert!(hidden.pixels().all(|(_, _, px)| px == [0, 0, 200, 255]));
//! ```

use mirage_core::{GridSpec, Parity, PixelBuffer};
use tracing::{debug, warn};

use crate::OpsResult;
use crate::parallel::for_each_row;

/// Running RGB sums plus a sample count.
type Acc = [u64; 4];

/// Reconstructs the layer stored on `hidden` cells.
///
/// Only `grid.cell_size` is used; `grid.parity` is ignored in favor of the
/// explicit `hidden` selector. Returns a new buffer and leaves `buffer`
/// untouched.
///
/// # Errors
///
/// Returns an invalid-grid error if `grid.cell_size == 0`.
pub fn decompose(buffer: &PixelBuffer, grid: &GridSpec, hidden: Parity) -> OpsResult<PixelBuffer> {
    grid.validate()?;

    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let r = grid.cell_size as usize;
    debug!(width = w, height = h, cell_size = r, %hidden, "decompose");
    if r >= w && r >= h {
        warn!(
            cell_size = r,
            width = w,
            height = h,
            "cell size covers the whole image, nothing to reconstruct"
        );
    }

    let is_hidden = |x: usize, y: usize| grid.parity_at(x as u32, y as u32) == hidden;
    let src = buffer.data();
    let row_len = buffer.row_len();

    let mut out = buffer.clone();
    for_each_row(out.data_mut(), row_len, |y, row| {
        let top = y.saturating_sub(r);
        let bottom = y.saturating_add(r).min(h - 1);

        // Hidden-pixel sums per column over the vertical window.
        let mut cols: Vec<Acc> = vec![[0; 4]; w];
        for ny in top..=bottom {
            let src_row = &src[ny * row_len..(ny + 1) * row_len];
            for (x, col) in cols.iter_mut().enumerate() {
                if is_hidden(x, ny) {
                    let px = &src_row[x * 4..x * 4 + 3];
                    col[0] += px[0] as u64;
                    col[1] += px[1] as u64;
                    col[2] += px[2] as u64;
                    col[3] += 1;
                }
            }
        }

        let mut prefix: Vec<Acc> = Vec::with_capacity(w + 1);
        prefix.push([0; 4]);
        for col in &cols {
            let last = prefix[prefix.len() - 1];
            prefix.push([last[0] + col[0], last[1] + col[1], last[2] + col[2], last[3] + col[3]]);
        }

        for x in 0..w {
            if is_hidden(x, y) {
                continue;
            }
            let left = x.saturating_sub(r);
            let right = x.saturating_add(r).min(w - 1);
            let (hi, lo) = (prefix[right + 1], prefix[left]);
            let count = hi[3] - lo[3];
            if count == 0 {
                continue;
            }
            for c in 0..3 {
                row[x * 4 + c] = rounded_mean(hi[c] - lo[c], count);
            }
        }
    });

    Ok(out)
}

/// `round(sum / count)` with halves rounded up.
#[inline]
fn rounded_mean(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::compose;

    /// Direct window scan, one pixel at a time.
    fn naive(buffer: &PixelBuffer, cell_size: u32, hidden: Parity) -> PixelBuffer {
        let grid = GridSpec::new(cell_size, hidden).unwrap();
        let (w, h) = (buffer.width() as i64, buffer.height() as i64);
        let r = cell_size as i64;
        let mut out = buffer.clone();
        for (x, y, px) in buffer.pixels() {
            if grid.parity_at(x, y) == hidden {
                continue;
            }
            let (mut sum, mut count) = ([0u64; 3], 0u64);
            for dy in -r..=r {
                for dx in -r..=r {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    if grid.parity_at(nx as u32, ny as u32) == hidden {
                        let n = buffer.pixel(nx as u32, ny as u32);
                        for c in 0..3 {
                            sum[c] += n[c] as u64;
                        }
                        count += 1;
                    }
                }
            }
            if count > 0 {
                let mean = |s: u64| (s as f64 / count as f64 + 0.5).floor() as u8;
                out.set_pixel(x, y, [mean(sum[0]), mean(sum[1]), mean(sum[2]), px[3]]);
            }
        }
        out
    }

    fn noise(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        let mut state = 0x2545_f491u32;
        for y in 0..h {
            for x in 0..w {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let [r, g, b, a] = state.to_le_bytes();
                buf.set_pixel(x, y, [r, g, b, a]);
            }
        }
        buf
    }

    #[test]
    fn test_round_trip_solid_layers() {
        let a = PixelBuffer::filled(4, 4, [200, 0, 0, 255]).unwrap();
        let b = PixelBuffer::filled(4, 4, [0, 0, 200, 255]).unwrap();
        let grid = GridSpec::default();
        let composite = compose(a, &b, &grid).unwrap();

        let out = decompose(&composite, &grid, Parity::Odd).unwrap();
        for (x, y, px) in out.pixels() {
            assert_eq!(px, [0, 0, 200, 255], "({x},{y})");
        }
    }

    #[test]
    fn test_matches_window_scan() {
        let buf = noise(13, 9);
        for cell_size in [1, 2, 3, 5, 20] {
            for hidden in [Parity::Even, Parity::Odd] {
                let grid = GridSpec::new(cell_size, Parity::Even).unwrap();
                let fast = decompose(&buf, &grid, hidden).unwrap();
                assert_eq!(fast, naive(&buf, cell_size, hidden), "cell {cell_size} {hidden}");
            }
        }
    }

    #[test]
    fn test_hidden_pixels_copied_through() {
        let buf = noise(8, 8);
        let grid = GridSpec::new(2, Parity::Even).unwrap();
        let out = decompose(&buf, &grid, Parity::Odd).unwrap();
        for (x, y, px) in out.pixels() {
            if grid.parity_at(x, y) == Parity::Odd {
                assert_eq!(px, buf.pixel(x, y));
            }
            assert_eq!(px[3], buf.pixel(x, y)[3], "alpha at ({x},{y})");
        }
    }

    #[test]
    fn test_empty_neighborhood_is_noop() {
        // One pixel: even cell, no odd neighbors.
        let one = PixelBuffer::filled(1, 1, [12, 34, 56, 78]).unwrap();
        let out = decompose(&one, &GridSpec::default(), Parity::Odd).unwrap();
        assert_eq!(out, one);

        // Cell larger than the image: every pixel sits in cell (0, 0).
        let buf = noise(3, 3);
        let grid = GridSpec::new(8, Parity::Even).unwrap();
        assert_eq!(decompose(&buf, &grid, Parity::Odd).unwrap(), buf);
    }

    #[test]
    fn test_mean_rounds_half_up() {
        let mut buf = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        // (0,0) is visible; its hidden neighbors are (1,0) and (0,1).
        buf.set_pixel(1, 0, [10, 0, 255, 255]);
        buf.set_pixel(0, 1, [11, 1, 254, 255]);
        let out = decompose(&buf, &GridSpec::default(), Parity::Odd).unwrap();
        assert_eq!(out.pixel(0, 0), [11, 1, 255, 255]);
    }

    #[test]
    fn test_source_untouched() {
        let buf = noise(6, 6);
        let copy = buf.clone();
        let _ = decompose(&buf, &GridSpec::default(), Parity::Even).unwrap();
        assert_eq!(buf, copy);
    }

    #[test]
    fn test_invalid_grid() {
        let buf = PixelBuffer::new(2, 2).unwrap();
        let grid = GridSpec {
            cell_size: 0,
            parity: Parity::Even,
        };
        assert!(decompose(&buf, &grid, Parity::Odd).unwrap_err().is_invalid_grid());
    }
}
