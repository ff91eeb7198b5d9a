//! Receipt attachments.

use crate::detect::{self, AttachmentFormat};
use crate::error::{Error, Result};

/// Kind of a receipt attachment, resolved from its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Raster image, one normalized page.
    Image(AttachmentFormat),
    /// Existing PDF, contributes its own pages.
    Pdf,
}

/// One receipt file supplied by the user.
///
/// Attachments are opaque byte buffers captured at the moment assembly
/// begins; there is no live file handle behind them. The declared MIME
/// type is kept for error reporting but the bytes themselves decide how
/// the attachment is normalized.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Original filename, used in warnings.
    pub name: String,

    /// Declared MIME type (`image/*` or `application/pdf`).
    pub mime: String,

    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Byte size of the attachment.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the declared MIME type is acceptable at all.
    pub fn mime_accepted(&self) -> bool {
        self.mime.starts_with("image/") || self.mime == "application/pdf"
    }

    /// Resolve the attachment kind from its bytes.
    ///
    /// Intake already filters MIME types, but declared types are not
    /// trusted: both the declared type and the sniffed magic bytes must
    /// agree that the attachment is an image or a PDF.
    pub fn kind(&self) -> Result<AttachmentKind> {
        if !self.mime_accepted() {
            return Err(Error::UnsupportedAttachment(format!(
                "{}: declared type {}",
                self.name, self.mime
            )));
        }
        match detect::detect_format(&self.data)? {
            AttachmentFormat::Pdf => Ok(AttachmentKind::Pdf),
            format => Ok(AttachmentKind::Image(format)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_kind() {
        let att = Attachment::new("scan.pdf", "application/pdf", b"%PDF-1.4 rest".to_vec());
        assert_eq!(att.kind().unwrap(), AttachmentKind::Pdf);
    }

    #[test]
    fn test_image_kind() {
        let att = Attachment::new("r.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(
            att.kind().unwrap(),
            AttachmentKind::Image(AttachmentFormat::Jpeg)
        );
    }

    #[test]
    fn test_declared_type_rejected() {
        let att = Attachment::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(!att.mime_accepted());
        assert!(matches!(
            att.kind(),
            Err(Error::UnsupportedAttachment(_))
        ));
    }

    #[test]
    fn test_mislabeled_bytes_rejected() {
        // Declared as an image, but the bytes are neither image nor PDF.
        let att = Attachment::new("fake.png", "image/png", b"MZ\x90\x00".to_vec());
        assert!(att.mime_accepted());
        assert!(att.kind().is_err());
    }
}
