//! Signature embedding.
//!
//! Draws each captured signature into its slot rectangle on the form
//! page, preserving aspect ratio and anchoring at the bottom-left of the
//! rectangle. An empty slot stays blank; a malformed signature image is
//! logged and skipped without failing the page.

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId};

use super::bitmap::Bitmap;
use super::layout::PageLayout;
use crate::model::{Signatures, SkippedAttachment};

/// XObject registrations and draw operations for the signature band.
#[derive(Debug, Default)]
pub struct SignatureOverlay {
    /// (resource name, XObject id) pairs to register on the page.
    pub xobjects: Vec<(String, ObjectId)>,

    /// Content stream operations drawing the signatures.
    pub operations: Vec<Operation>,

    /// Slots skipped because their image did not decode.
    pub warnings: Vec<SkippedAttachment>,
}

/// Embed every non-empty signature into the document.
///
/// XObjects are added to `doc`; the returned operations reference them by
/// the names in `xobjects`, which the page composer registers in the page
/// resource dictionary.
pub fn embed(doc: &mut Document, layout: &PageLayout, signatures: &Signatures) -> SignatureOverlay {
    let mut overlay = SignatureOverlay::default();

    for (index, slot) in layout.signatures.iter().enumerate() {
        let image = signatures.for_slot(&slot.slot_id);
        if image.is_empty() {
            continue;
        }

        let bitmap = match Bitmap::decode(image.as_bytes()) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::warn!("Skipping {} signature: {}", slot.slot_id, e);
                overlay.warnings.push(SkippedAttachment::new(
                    slot.slot_id.clone(),
                    format!("signature not decodable: {}", e),
                ));
                continue;
            }
        };

        let xobject_id = match bitmap.add_to(doc) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Skipping {} signature: {}", slot.slot_id, e);
                overlay.warnings.push(SkippedAttachment::new(
                    slot.slot_id.clone(),
                    format!("signature not embeddable: {}", e),
                ));
                continue;
            }
        };

        let (width, height) = slot
            .rect
            .fit(bitmap.width() as f32, bitmap.height() as f32);
        let name = format!("Sig{}", index);

        overlay.operations.push(Operation::new("q", vec![]));
        overlay.operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(width),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(height),
                Object::Real(slot.rect.x),
                Object::Real(slot.rect.y),
            ],
        ));
        overlay.operations.push(Operation::new(
            "Do",
            vec![Object::Name(name.clone().into_bytes())],
        ));
        overlay.operations.push(Operation::new("Q", vec![]));

        overlay.xobjects.push((name, xobject_id));
    }

    overlay
}
