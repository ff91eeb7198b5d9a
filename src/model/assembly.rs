//! Assembly call input and output artifacts.

use super::{Attachment, FormRecord, Signatures};
use serde::Serialize;

/// Immutable snapshot handed to one assembly call.
#[derive(Debug, Clone, Default)]
pub struct AssemblyInput {
    /// Textual form values.
    pub record: FormRecord,

    /// Captured signatures (either slot may be empty).
    pub signatures: Signatures,

    /// Receipt files in the order the user added them. This order is the
    /// page order of the output and must be preserved exactly.
    pub attachments: Vec<Attachment>,
}

impl AssemblyInput {
    pub fn new(record: FormRecord) -> Self {
        Self {
            record,
            ..Default::default()
        }
    }

    /// Attach the signature set.
    pub fn with_signatures(mut self, signatures: Signatures) -> Self {
        self.signatures = signatures;
        self
    }

    /// Append one attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A recoverable per-item failure reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAttachment {
    /// Filename of the skipped attachment, or the signature slot id for
    /// a signature decode failure.
    pub name: String,

    /// Human-readable reason.
    pub reason: String,
}

impl SkippedAttachment {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// The finished document.
///
/// Immutable once produced; the caller owns delivery (save dialog,
/// download, ...). `warnings` lists every attachment or signature that
/// was skipped without aborting the run.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    /// Serialized PDF byte stream, self-contained.
    pub bytes: Vec<u8>,

    /// Total page count: 1 form page + pages of surviving attachments.
    pub page_count: u32,

    /// Recoverable failures collected during assembly.
    pub warnings: Vec<SkippedAttachment>,
}

impl AssembledDocument {
    /// Whether anything was skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
