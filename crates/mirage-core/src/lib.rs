//! # mirage-core
//!
//! Core types for checkerboard image interleaving.
//!
//! This crate provides the foundational types used by the rest of the
//! workspace:
//!
//! - [`PixelBuffer`] - Owned 8-bit RGBA raster, one contiguous allocation
//! - [`Rgba`] - A single RGBA sample
//! - [`GridSpec`], [`Parity`] - Checkerboard cell geometry and layer assignment
//! - [`luminance`] - Integer luma used for histograms
//! - [`Error`], [`Result`] - Buffer and grid validation errors
//!
//! ## Crate Structure
//!
//! ```text
//! mirage-core (this crate)
//!    ^
//!    |
//!    +-- mirage-ops (grading, histogram, resize, compose, decompose)
//!    +-- mirage-io (file decode/encode, presets)
//!    +-- mirage-cli
//! ```
//!
//! The core performs no I/O. Buffers are created from already-decoded
//! samples and every transformation either mutates a buffer in place or
//! produces a new one.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod grid;
pub mod image;
pub mod pixel;

// Re-exports for convenience
pub use error::*;
pub use grid::{GridSpec, Parity};
pub use image::PixelBuffer;
pub use pixel::{luminance, Rgba, LUMA_B, LUMA_G, LUMA_R};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use mirage_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{GridSpec, Parity};
    pub use crate::image::PixelBuffer;
    pub use crate::pixel::{luminance, Rgba};
}
