//! Error types for mirage-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of buffer construction and
//! grid validation:
//! - Empty or inconsistent buffers
//! - Layers of different size handed to a two-input operation
//! - Checkerboard grids with a zero cell size
//!
//! # Usage
//!
//! ```rust
//! use mirage_core::{Error, Result};
//!
//! fn check_cell(cell_size: u32) -> Result<()> {
//!     if cell_size == 0 {
//!         return Err(Error::InvalidGrid { cell_size });
//!     }
//!     Ok(())
//! }
//! assert!(check_cell(0).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or combining pixel buffers.
///
/// # Categories
///
/// - **Shape errors**: [`EmptyBuffer`](Error::EmptyBuffer), [`InvalidDimensions`](Error::InvalidDimensions)
/// - **Pairing errors**: [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Grid errors**: [`InvalidGrid`](Error::InvalidGrid)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width or height is zero.
    #[error("empty buffer: {width}x{height}")]
    EmptyBuffer {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Sample data does not match the declared dimensions.
    ///
    /// Also returned when `width * height * 4` overflows `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Two layers that must share a geometry do not.
    ///
    /// The compositor never resamples on its own; callers resample the
    /// hidden layer to the carrier first.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First layer width
        a_width: u32,
        /// First layer height
        a_height: u32,
        /// Second layer width
        b_width: u32,
        /// Second layer height
        b_height: u32,
    },

    /// Checkerboard cell size must be at least one pixel.
    #[error("invalid grid: cell size {cell_size} (must be >= 1)")]
    InvalidGrid {
        /// Offending cell size
        cell_size: u32,
    },
}

impl Error {
    /// Creates an [`Error::EmptyBuffer`] error.
    #[inline]
    pub fn empty_buffer(width: u32, height: u32) -> Self {
        Self::EmptyBuffer { width, height }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Returns `true` for an empty-buffer error.
    #[inline]
    pub fn is_empty_buffer(&self) -> bool {
        matches!(self, Self::EmptyBuffer { .. })
    }

    /// Returns `true` for a layer size mismatch.
    #[inline]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Returns `true` for an invalid grid.
    #[inline]
    pub fn is_invalid_grid(&self) -> bool {
        matches!(self, Self::InvalidGrid { .. })
    }
}
