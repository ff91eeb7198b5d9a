//! Final document assembly.
//!
//! Concatenates the form page with the normalized attachment page groups,
//! rebuilds a single page tree, and serializes everything into one
//! self-contained byte stream. The output embeds every resource and
//! carries no timestamps or random identifiers, so identical inputs
//! serialize to identical bytes.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::compose;
use crate::error::{Error, Result};
use crate::model::{AssembledDocument, AssemblyInput};
use crate::normalize::{self, NormalizedAttachment};
use crate::schema::FieldSet;

/// Fixed producer string written to the document info dictionary.
const PRODUCER: &str = concat!("paydoc ", env!("CARGO_PKG_VERSION"));

/// Options for one assembly run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Field set driving validation and page layout.
    pub schema: FieldSet,

    /// Normalize attachments in parallel with page composition.
    pub parallel: bool,

    /// Compress content streams in the output.
    pub compress: bool,
}

impl AssembleOptions {
    /// Create options with the default payout-voucher schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom field set.
    pub fn with_schema(mut self, schema: FieldSet) -> Self {
        self.schema = schema;
        self
    }

    /// Disable parallel normalization.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Keep content streams uncompressed (useful for debugging output).
    pub fn uncompressed(mut self) -> Self {
        self.compress = false;
        self
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            schema: FieldSet::payout_voucher(),
            parallel: true,
            compress: true,
        }
    }
}

/// Run the full assembly pipeline for one input snapshot.
pub fn run(input: &AssemblyInput, options: &AssembleOptions) -> Result<AssembledDocument> {
    // Validation gates everything: no page objects exist before this check.
    let missing = input.record.missing_required(&options.schema);
    if !missing.is_empty() {
        return Err(Error::MissingFields(missing));
    }

    // The form page has no data dependency on attachment normalization,
    // so the two halves may run concurrently. Normalized groups are
    // appended after the form page, never interleaved.
    let (form, (normalized, attachment_warnings)) = if options.parallel {
        rayon::join(
            || compose::build_form_document(&options.schema, &input.record, &input.signatures),
            || normalize::normalize_all(&input.attachments, true),
        )
    } else {
        (
            compose::build_form_document(&options.schema, &input.record, &input.signatures),
            normalize::normalize_all(&input.attachments, false),
        )
    };

    let (form_doc, signature_warnings) = form?;
    let mut warnings = signature_warnings;
    warnings.extend(attachment_warnings);

    let expected_pages = 1 + normalized.iter().map(|n| n.page_count).sum::<u32>();
    let mut merged = merge(form_doc, normalized)?;

    let page_count = merged.get_pages().len() as u32;
    if page_count != expected_pages {
        return Err(Error::Assembly(format!(
            "page tree holds {} pages, expected {}",
            page_count, expected_pages
        )));
    }

    let info_id = merged.add_object(dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    });
    merged.trailer.set("Info", Object::Reference(info_id));

    if options.compress {
        merged.compress();
    }

    let mut bytes = Vec::new();
    merged
        .save_to(&mut bytes)
        .map_err(|e| Error::Assembly(e.to_string()))?;

    Ok(AssembledDocument {
        bytes,
        page_count,
        warnings,
    })
}

/// Merge the form document and the attachment groups into one document.
///
/// Every object is copied (renumbered into a shared id space); the donor
/// catalogs and page-tree nodes are discarded and replaced by a single
/// Pages node whose Kids hold all pages in document order.
fn merge(form_doc: Document, attachments: Vec<NormalizedAttachment>) -> Result<Document> {
    let mut merged = Document::with_version("1.5");
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    let donors = std::iter::once(form_doc).chain(attachments.into_iter().map(|n| n.doc));
    for mut doc in donors {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        // get_pages is keyed by page number, so iteration preserves the
        // donor's own page order.
        page_ids.extend(doc.get_pages().into_values());
        objects.extend(doc.objects);
    }

    let pages_id = (max_id, 0);
    max_id += 1;
    let catalog_id = (max_id, 0);

    for (object_id, object) in objects {
        match object.type_name().unwrap_or("") {
            // Donor structure nodes are rebuilt, not copied.
            "Catalog" | "Pages" | "Outlines" | "Outline" => {}
            "Page" => {
                let mut dict = object
                    .as_dict()
                    .map_err(|e| Error::Assembly(e.to_string()))?
                    .clone();
                dict.set("Parent", Object::Reference(pages_id));
                merged.objects.insert(object_id, Object::Dictionary(dict));
            }
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(page_ids.len() as i64),
            "Kids" => page_ids
                .iter()
                .map(|id| Object::Reference(*id))
                .collect::<Vec<_>>(),
        }),
    );
    merged.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        }),
    );
    merged.trailer.set("Root", catalog_id);
    merged.max_id = catalog_id.0;
    merged.renumber_objects();
    merged.adjust_zero_pages();

    Ok(merged)
}
