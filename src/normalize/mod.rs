//! Attachment normalization.
//!
//! Turns each receipt attachment into a standalone page group: a raster
//! image becomes one A4 page with the image centered and scaled to fit, a
//! PDF passes its own pages through untouched. Groups come back in input
//! order; a group that fails to normalize is dropped with a warning and
//! never aborts the batch.

mod image_page;
mod pdf_doc;

use lopdf::Document;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Attachment, AttachmentKind, SkippedAttachment};

/// One attachment rendered as a self-contained page group.
#[derive(Debug)]
pub struct NormalizedAttachment {
    /// Source filename.
    pub name: String,

    /// Single-purpose document holding this attachment's pages.
    pub doc: Document,

    /// Pages the attachment contributes to the output.
    pub page_count: u32,
}

/// Normalize a single attachment.
pub fn normalize_one(attachment: &Attachment) -> Result<NormalizedAttachment> {
    match attachment.kind()? {
        AttachmentKind::Image(_) => image_page::build(attachment),
        AttachmentKind::Pdf => pdf_doc::load(attachment),
    }
}

/// Normalize every attachment, preserving input order.
///
/// Returns the surviving page groups and one warning per skipped
/// attachment. Recoverable per-attachment failures (bad image data,
/// unparsable or encrypted PDF, unsupported format) never fail the batch.
pub fn normalize_all(
    attachments: &[Attachment],
    parallel: bool,
) -> (Vec<NormalizedAttachment>, Vec<SkippedAttachment>) {
    let results: Vec<Result<NormalizedAttachment>> = if parallel {
        attachments.par_iter().map(normalize_one).collect()
    } else {
        attachments.iter().map(normalize_one).collect()
    };

    let mut normalized = Vec::with_capacity(results.len());
    let mut warnings = Vec::new();
    for (attachment, result) in attachments.iter().zip(results) {
        match result {
            Ok(group) => normalized.push(group),
            Err(e) => {
                // Every normalization failure is per-attachment and
                // recoverable: one bad receipt must not block the batch.
                log::warn!("Skipping attachment {}: {}", attachment.name, e);
                warnings.push(SkippedAttachment::new(&attachment.name, e.to_string()));
            }
        }
    }
    (normalized, warnings)
}

pub(crate) fn attachment_parse_error(attachment: &Attachment, reason: impl Into<String>) -> Error {
    Error::AttachmentParse {
        name: attachment.name.clone(),
        reason: reason.into(),
    }
}
