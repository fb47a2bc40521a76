//! # mirage-ops
//!
//! Pixel engine for checkerboard image interleaving.
//!
//! Two images go in, one comes out: the carrier and the hidden image are
//! graded independently, the hidden one is resampled to the carrier's size,
//! and the two are interleaved cell by cell. Recovery runs the other way,
//! estimating the hidden layer from a single composite.
//!
//! # Modules
//!
//! - [`grade`] - Levels, exposure, brightness and contrast
//! - [`histogram`] - 256-bin luminance histogram
//! - [`resize`] - Resampling to target dimensions
//! - [`checker`] - Checkerboard compositing
//! - [`decompose`] - Hidden-layer reconstruction
//! - [`pipeline`] - Compose and recover flows, presets
//! - [`parallel`] - Row dispatch (Rayon with the `parallel` feature)
//!
//! # Example
//!
//! ```rust
//! use mirage_core::PixelBuffer;
//! use mirage_ops::pipeline::{compose_images, recover_image, ComposeSettings, RecoverSettings};
//!
//! let carrier = PixelBuffer::filled(16, 16, [230, 230, 230, 255]).unwrap();
//! let hidden = PixelBuffer::filled(8, 8, [10, 10, 10, 255]).unwrap();
//!
//! let out = compose_images(&carrier, &hidden, &ComposeSettings::default()).unwrap();
//! let rec = recover_image(&out.composite, &RecoverSettings::default()).unwrap();
//! assert_eq!(rec.image.dimensions(), (16, 16));
//! ```
//!
//! Every operation is a pure function of its inputs. Operations that mutate
//! say so (`grade`); all others return a new buffer.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod checker;
pub mod decompose;
pub mod grade;
pub mod histogram;
pub mod parallel;
pub mod pipeline;
pub mod resize;

pub use error::{OpsError, OpsResult};
pub use grade::{GradeSettings, Levels};
pub use histogram::Histogram;
pub use pipeline::Preset;
pub use resize::Filter;
