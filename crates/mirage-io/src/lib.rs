//! # mirage-io
//!
//! File boundary for the mirage engine.
//!
//! Decodes PNG, JPEG, BMP and WebP files into [`PixelBuffer`]s and encodes
//! them back, using the `image` crate. Every decoded image is converted to
//! 8-bit RGBA; JPEG output drops alpha.
//!
//! Also loads and saves YAML [`preset`] files.
//!
//! # Example
//!
//! ```rust,ignore
//! use mirage_io::{read, write};
//!
//! let carrier = read("carrier.jpg")?;
//! write("copy.png", &carrier)?;
//! ```

#![warn(missing_docs)]

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use image::{DynamicImage, ImageReader, RgbaImage};
use mirage_core::PixelBuffer;
use tracing::debug;

mod detect;
mod error;
pub mod preset;

pub use detect::Format;
pub use error::{IoError, IoResult};

/// Basic facts about an image file, read without a full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Detected container format.
    pub format: Format,
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

fn into_buffer(img: DynamicImage) -> IoResult<PixelBuffer> {
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::from_raw(width, height, rgba.into_raw())?)
}

/// Reads an image file into an RGBA buffer.
///
/// The format comes from the file header, falling back to the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the format is not one of
/// PNG/JPEG/BMP/WebP, or decoding fails.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let image_format = format.image_format().ok_or_else(|| unsupported(path))?;

    let reader = BufReader::new(File::open(path)?);
    let img = ImageReader::with_format(reader, image_format)
        .decode()
        .map_err(|e| IoError::DecodeError(format!("{}: {e}", path.display())))?;

    debug!(path = %path.display(), format = format.name(), width = img.width(), height = img.height(), "read");
    into_buffer(img)
}

/// Decodes an in-memory image.
pub fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|e| IoError::DecodeError(e.to_string()))?;
    into_buffer(img)
}

/// Encodes a buffer into the given format.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for [`Format::Unknown`].
pub fn encode(buffer: &PixelBuffer, format: Format) -> IoResult<Vec<u8>> {
    let image_format = format
        .image_format()
        .ok_or_else(|| IoError::UnsupportedFormat(format.name().to_string()))?;

    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
        .ok_or_else(|| IoError::EncodeError("sample count does not match dimensions".into()))?;
    let img = DynamicImage::ImageRgba8(rgba);
    let img = if format.has_alpha() {
        img
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image_format)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(out.into_inner())
}

/// Writes a buffer to a file, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if the extension is not a supported format, encoding
/// fails, or the file cannot be written.
pub fn write<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    if format == Format::Unknown {
        return Err(unsupported(path));
    }

    let bytes = encode(buffer, format)?;
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), format = format.name(), bytes = bytes.len(), "write");
    Ok(())
}

/// Reads dimensions and format from the file header.
pub fn probe<P: AsRef<Path>>(path: P) -> IoResult<ImageInfo> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let image_format = format.image_format().ok_or_else(|| unsupported(path))?;
    let reader = BufReader::new(File::open(path)?);
    let (width, height) = ImageReader::with_format(reader, image_format)
        .into_dimensions()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    Ok(ImageInfo {
        width,
        height,
        format,
    })
}
