//! Attachment format detection and validation.
//!
//! Attachments arrive with a declared MIME type, but the declared type is
//! intake-side metadata the core does not trust: the bytes are sniffed
//! again before any decoding happens.

use crate::error::{Error, Result};

/// Detected attachment format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
    Tiff,
    Pdf,
}

impl AttachmentFormat {
    /// Whether this format is a raster image.
    pub fn is_image(&self) -> bool {
        !matches!(self, AttachmentFormat::Pdf)
    }
}

impl std::fmt::Display for AttachmentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentFormat::Png => write!(f, "PNG"),
            AttachmentFormat::Jpeg => write!(f, "JPEG"),
            AttachmentFormat::Gif => write!(f, "GIF"),
            AttachmentFormat::Bmp => write!(f, "BMP"),
            AttachmentFormat::WebP => write!(f, "WebP"),
            AttachmentFormat::Tiff => write!(f, "TIFF"),
            AttachmentFormat::Pdf => write!(f, "PDF"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// PNG signature.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
/// JPEG SOI marker.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Sniff the format of an attachment from its leading bytes.
///
/// # Returns
/// * `Ok(AttachmentFormat)` when the bytes carry a supported magic number
/// * `Err(Error::UnsupportedAttachment)` otherwise
pub fn detect_format(data: &[u8]) -> Result<AttachmentFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(AttachmentFormat::Pdf);
    }
    if data.starts_with(PNG_MAGIC) {
        return Ok(AttachmentFormat::Png);
    }
    if data.starts_with(JPEG_MAGIC) {
        return Ok(AttachmentFormat::Jpeg);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Ok(AttachmentFormat::Gif);
    }
    if data.starts_with(b"BM") {
        return Ok(AttachmentFormat::Bmp);
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Ok(AttachmentFormat::WebP);
    }
    if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
        return Ok(AttachmentFormat::Tiff);
    }
    Err(Error::UnsupportedAttachment(describe_leading(data)))
}

/// Check if bytes begin with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Check if bytes begin with a supported raster image signature.
pub fn is_image_bytes(data: &[u8]) -> bool {
    matches!(detect_format(data), Ok(f) if f.is_image())
}

fn describe_leading(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty file".to_string();
    }
    let head: Vec<String> = data
        .iter()
        .take(4)
        .map(|b| format!("{:02X}", b))
        .collect();
    format!("unrecognized leading bytes {}", head.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf() {
        assert_eq!(
            detect_format(b"%PDF-1.7\n...").unwrap(),
            AttachmentFormat::Pdf
        );
        assert!(is_pdf_bytes(b"%PDF-1.4"));
        assert!(!is_pdf_bytes(b"PDF-1.4"));
    }

    #[test]
    fn test_detect_png() {
        let mut data = PNG_MAGIC.to_vec();
        data.extend_from_slice(b"rest");
        assert_eq!(detect_format(&data).unwrap(), AttachmentFormat::Png);
        assert!(is_image_bytes(&data));
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert_eq!(detect_format(&data).unwrap(), AttachmentFormat::Jpeg);
        assert!(is_image_bytes(&data));
    }

    #[test]
    fn test_detect_other_rasters() {
        assert_eq!(detect_format(b"GIF89a...").unwrap(), AttachmentFormat::Gif);
        assert_eq!(detect_format(b"BM\x36\x00").unwrap(), AttachmentFormat::Bmp);
        assert_eq!(
            detect_format(b"RIFF\x00\x00\x00\x00WEBPVP8 ").unwrap(),
            AttachmentFormat::WebP
        );
        assert_eq!(detect_format(b"II*\0data").unwrap(), AttachmentFormat::Tiff);
    }

    #[test]
    fn test_reject_unknown() {
        let err = detect_format(b"<html>").unwrap_err();
        assert!(matches!(err, Error::UnsupportedAttachment(_)));
        assert!(detect_format(&[]).is_err());
    }
}
