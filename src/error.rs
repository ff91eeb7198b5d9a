//! Error types for the paydoc library.

use std::io;
use thiserror::Error;

/// Result type alias for paydoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document assembly.
///
/// Only [`Error::MissingFields`], [`Error::Assembly`], and [`Error::Io`]
/// abort an assembly run. The per-attachment variants are recoverable:
/// the affected signature or attachment is skipped and the failure is
/// reported as a [`SkippedAttachment`](crate::model::SkippedAttachment)
/// warning on the successful result.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input bytes or writing the output stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Required form fields are empty. Reported before any page is composed.
    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A signature image could not be decoded.
    #[error("Signature decode error ({slot}): {reason}")]
    SignatureDecode { slot: String, reason: String },

    /// An image attachment could not be decoded.
    #[error("Image decode error ({name}): {reason}")]
    ImageDecode { name: String, reason: String },

    /// A PDF attachment could not be parsed (corrupted, encrypted, or
    /// using an unsupported feature).
    #[error("Attachment parse error ({name}): {reason}")]
    AttachmentParse { name: String, reason: String },

    /// The attachment bytes match neither a supported image format nor PDF.
    #[error("Unsupported attachment format: {0}")]
    UnsupportedAttachment(String),

    /// Failure while building or serializing the final document.
    #[error("Assembly error: {0}")]
    Assembly(String),
}

impl Error {
    /// Whether this error aborts the whole assembly run.
    ///
    /// Recoverable errors are collected as warnings instead; see the
    /// propagation policy on [`assemble`](crate::assemble()).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::MissingFields(_) | Error::Assembly(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Assembly(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let err = Error::MissingFields(vec!["date".into(), "amount".into()]);
        assert_eq!(err.to_string(), "Required fields missing: date, amount");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_recoverable_errors_not_fatal() {
        let err = Error::ImageDecode {
            name: "receipt.jpg".into(),
            reason: "truncated".into(),
        };
        assert!(!err.is_fatal());

        let err = Error::AttachmentParse {
            name: "scan.pdf".into(),
            reason: "encrypted".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fatal());
    }
}
