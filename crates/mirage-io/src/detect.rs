//! Format detection from extensions and magic bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::IoResult;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG.
    Png,
    /// JPEG. No alpha; written as RGB.
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// WebP, written lossless.
    WebP,
    /// Anything else.
    Unknown,
}

impl Format {
    /// Detects format from a file: magic bytes first, then extension.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = [0u8; 12];
        let n = File::open(path)?.read(&mut header)?;

        match Self::from_bytes(&header[..n]) {
            Format::Unknown => Ok(Self::from_extension(path)),
            format => Ok(format),
        }
    }

    /// Detects format from the file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Format::Png,
            Some("jpg") | Some("jpeg") => Format::Jpeg,
            Some("bmp") => Format::Bmp,
            Some("webp") => Format::WebP,
            _ => Format::Unknown,
        }
    }

    /// Detects format from a file header.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Format::Png;
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Format::Jpeg;
        }
        if bytes.starts_with(b"BM") {
            return Format::Bmp;
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Format::WebP;
        }
        Format::Unknown
    }

    /// Matching `image` crate format.
    pub(crate) fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            Format::Png => Some(image::ImageFormat::Png),
            Format::Jpeg => Some(image::ImageFormat::Jpeg),
            Format::Bmp => Some(image::ImageFormat::Bmp),
            Format::WebP => Some(image::ImageFormat::WebP),
            Format::Unknown => None,
        }
    }

    /// Returns `true` if the format stores an alpha channel.
    pub fn has_alpha(self) -> bool {
        !matches!(self, Format::Jpeg | Format::Unknown)
    }

    /// Short uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Bmp => "BMP",
            Format::WebP => "WebP",
            Format::Unknown => "unknown",
        }
    }
}
