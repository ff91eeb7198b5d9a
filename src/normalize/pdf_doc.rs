//! PDF attachments: pass-through page groups.
//!
//! An attached PDF contributes its own pages unchanged. Because the pages
//! leave their original document, attributes a page inherits from its
//! ancestors (media box, resources, rotation) are materialized onto the
//! page dictionary first; the assembler then reparents the pages under the
//! output page tree without losing anything.

use lopdf::{Document, Object, ObjectId};

use super::{attachment_parse_error, NormalizedAttachment};
use crate::error::Result;
use crate::model::Attachment;

/// Keys a page may inherit from ancestor Pages nodes.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Parse a PDF attachment and prepare its pages for merging.
pub fn load(attachment: &Attachment) -> Result<NormalizedAttachment> {
    let mut doc = Document::load_mem(&attachment.data)
        .map_err(|e| attachment_parse_error(attachment, e.to_string()))?;

    if doc.is_encrypted() {
        return Err(attachment_parse_error(attachment, "document is encrypted"));
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(attachment_parse_error(attachment, "document has no pages"));
    }
    let page_count = pages.len() as u32;

    materialize_inherited(&mut doc, pages.into_values().collect());

    Ok(NormalizedAttachment {
        name: attachment.name.clone(),
        doc,
        page_count,
    })
}

/// Copy inherited attributes down onto each page dictionary.
fn materialize_inherited(doc: &mut Document, page_ids: Vec<ObjectId>) {
    for page_id in page_ids {
        for key in INHERITABLE_KEYS {
            let already_present = doc
                .get_object(page_id)
                .ok()
                .and_then(|o| o.as_dict().ok())
                .map(|d| d.has(key))
                .unwrap_or(true);
            if already_present {
                continue;
            }
            let parent = parent_of(doc, page_id);
            let inherited = parent.and_then(|p| inherited_value(doc, p, key));
            if let Some(value) = inherited {
                if let Ok(dict) = doc
                    .get_object_mut(page_id)
                    .and_then(|o| o.as_dict_mut())
                {
                    dict.set(key, value);
                }
            }
        }
    }
}

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_object(id)
        .ok()?
        .as_dict()
        .ok()?
        .get(b"Parent")
        .ok()?
        .as_reference()
        .ok()
}

/// Walk the Pages ancestor chain looking for `key`.
fn inherited_value(doc: &Document, mut node: ObjectId, key: &[u8]) -> Option<Object> {
    // Bounded walk in case of a malformed circular Parent chain.
    for _ in 0..32 {
        let dict = doc.get_object(node).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        node = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use lopdf::{dictionary, Stream};

    /// Minimal two-page PDF whose pages inherit MediaBox from the root.
    fn inheriting_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for _ in 0..2 {
            let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => Object::Integer(2),
                "Kids" => kids,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pass_through_keeps_page_count() {
        let attachment = Attachment::new("scan.pdf", "application/pdf", inheriting_pdf());
        let normalized = load(&attachment).unwrap();
        assert_eq!(normalized.page_count, 2);
    }

    #[test]
    fn test_inherited_media_box_is_materialized() {
        let attachment = Attachment::new("scan.pdf", "application/pdf", inheriting_pdf());
        let normalized = load(&attachment).unwrap();
        for (_, page_id) in normalized.doc.get_pages() {
            let dict = normalized
                .doc
                .get_object(page_id)
                .unwrap()
                .as_dict()
                .unwrap();
            assert!(dict.has(b"MediaBox"));
        }
    }

    /// The inheriting fixture with an Encrypt entry in its trailer.
    fn encrypted_pdf() -> Vec<u8> {
        let mut doc = Document::load_mem(&inheriting_pdf()).unwrap();
        // Per the PDF spec (and lopdf's is_encrypted), the trailer Encrypt
        // entry must be an indirect reference to the encryption dictionary.
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => Object::Integer(1),
            "R" => Object::Integer(2),
        });
        doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_encrypted_pdf_is_skipped_recoverably() {
        let attachment = Attachment::new("locked.pdf", "application/pdf", encrypted_pdf());
        let err = load(&attachment).unwrap_err();
        match &err {
            Error::AttachmentParse { name, reason } => {
                assert_eq!(name, "locked.pdf");
                assert!(reason.contains("encrypted"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_garbage_pdf_is_parse_error() {
        let attachment =
            Attachment::new("bad.pdf", "application/pdf", b"%PDF-1.4 not really".to_vec());
        let err = load(&attachment).unwrap_err();
        assert!(matches!(err, Error::AttachmentParse { .. }));
    }
}
