//! Pixel buffer type.
//!
//! [`PixelBuffer`] is the one data structure every stage of the engine
//! operates on: an owned 8-bit RGBA raster.
//!
//! # Memory Layout
//!
//! Samples are stored in **row-major** order, top-to-bottom, with the four
//! channels interleaved:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! One allocation per buffer; pixels are addressed by index, never by
//! pointer. Channel values are `u8`, so the `[0, 255]` invariant holds by
//! construction.
//!
//! # Usage
//!
//! ```rust
//! use mirage_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(4, 3).unwrap();
//! buf.set_pixel(1, 2, [200, 10, 10, 255]);
//! assert_eq!(buf.pixel(1, 2), [200, 10, 10, 255]);
//! assert_eq!(buf.pixel_count(), 12);
//! ```

use crate::{Error, Result, Rgba};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Owned RGBA8 raster.
///
/// Width and height are always non-zero and `data().len()` is always
/// `width * height * 4`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Interleaved RGBA samples
    data: Vec<u8>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

/// Validates dimensions and returns the sample count.
fn sample_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::empty_buffer(width, height));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}

impl PixelBuffer {
    /// Creates a transparent black buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBuffer`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = sample_len(width, height)?;
        Ok(Self {
            data: vec![0; len],
            width,
            height,
        })
    }

    /// Creates a buffer filled with one pixel value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mirage_core::PixelBuffer;
    ///
    /// let red = PixelBuffer::filled(2, 2, [200, 0, 0, 255]).unwrap();
    /// assert!(red.pixels().all(|(_, _, px)| px == [200, 0, 0, 255]));
    /// ```
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Result<Self> {
        let len = sample_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / CHANNELS {
            data.extend_from_slice(&pixel);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps already-decoded RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBuffer`] for zero dimensions and
    /// [`Error::InvalidDimensions`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = sample_len(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the length of one row in samples.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Returns `true` if both buffers have the same geometry.
    #[inline]
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer and returns its samples.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        self.data[o..o + CHANNELS].copy_from_slice(&pixel);
    }

    /// Fills the whole buffer with one pixel value.
    pub fn fill(&mut self, pixel: Rgba) {
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            chunk.copy_from_slice(&pixel);
        }
    }

    /// Returns row `y` as interleaved samples.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.row_len();
        &self.data[start..start + self.row_len()]
    }

    /// Returns row `y` as mutable interleaved samples.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row out of bounds");
        let len = self.row_len();
        let start = y as usize * len;
        &mut self.data[start..start + len]
    }

    /// Iterates over all pixels with their coordinates, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba)> + '_ {
        let width = self.width;
        self.data
            .chunks_exact(CHANNELS)
            .enumerate()
            .map(move |(i, px)| {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                (x, y, [px[0], px[1], px[2], px[3]])
            })
    }

    /// Applies a function to each pixel in place.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mirage_core::PixelBuffer;
    ///
    /// let mut buf = PixelBuffer::filled(3, 3, [10, 20, 30, 255]).unwrap();
    /// buf.map_pixels(|[r, g, b, a]| [b, g, r, a]);
    /// assert_eq!(buf.pixel(2, 2), [30, 20, 10, 255]);
    /// ```
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(Rgba) -> Rgba,
    {
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            let out = f([chunk[0], chunk[1], chunk[2], chunk[3]]);
            chunk.copy_from_slice(&out);
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("samples", &self.data.len())
            .finish()
    }
}
