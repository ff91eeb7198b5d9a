//! Form page composition.
//!
//! Renders the validated form record onto a single A4 page: title block,
//! labeled field values with deterministic wrapping, signature rectangles
//! with their captured images. The output depends only on the schema, the
//! record, and the signature bytes, never on clocks or randomness.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::layout::{
    self, encode_win_ansi, fold_diacritics, text_width, wrap_text, PageLayout, LABEL_SIZE,
    LINE_HEIGHT, PAGE_HEIGHT, PAGE_WIDTH, SUBTITLE_SIZE, TITLE_SIZE, VALUE_SIZE,
};
use super::signature;
use crate::error::Result;
use crate::model::{FormRecord, Signatures, SkippedAttachment};
use crate::schema::FieldSet;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Build a one-page document holding the filled form and its signatures.
///
/// Signature decode failures are reported in the returned warning list;
/// they never fail the page.
pub fn build_form_document(
    schema: &FieldSet,
    record: &FormRecord,
    signatures: &Signatures,
) -> Result<(Document, Vec<SkippedAttachment>)> {
    let layout = PageLayout::for_schema(schema);
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular_id = doc.add_object(base14_font("Helvetica"));
    let font_bold_id = doc.add_object(base14_font("Helvetica-Bold"));

    let overlay = signature::embed(&mut doc, &layout, signatures);

    let mut ops = Vec::new();
    compose_title(&mut ops, schema, &layout);
    for field_box in &layout.fields {
        compose_field(&mut ops, record, field_box);
    }
    compose_signature_band(&mut ops, &layout);
    ops.extend(overlay.operations);

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let mut xobjects = lopdf::Dictionary::new();
    for (name, id) in &overlay.xobjects {
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(*id));
    }
    let resources = dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => Object::Reference(font_regular_id),
            FONT_BOLD => Object::Reference(font_bold_id),
        },
        "XObject" => Object::Dictionary(xobjects),
    };

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Dictionary(resources),
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    Ok((doc, overlay.warnings))
}

fn base14_font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn compose_title(ops: &mut Vec<Operation>, schema: &FieldSet, layout: &PageLayout) {
    show_text_centered(ops, FONT_BOLD, TITLE_SIZE, layout.title_y, &schema.title);
    if !schema.subtitle.is_empty() {
        show_text_centered(
            ops,
            FONT_REGULAR,
            SUBTITLE_SIZE,
            layout.subtitle_y,
            &schema.subtitle,
        );
    }
}

fn compose_field(ops: &mut Vec<Operation>, record: &FormRecord, field_box: &layout::FieldBox) {
    show_text(
        ops,
        FONT_BOLD,
        LABEL_SIZE,
        field_box.x,
        field_box.label_y,
        &field_box.label,
    );

    let value = record.get(&field_box.id);
    let lines = wrap_text(value, VALUE_SIZE, field_box.width, field_box.max_lines);
    for (i, line) in lines.iter().enumerate() {
        show_text(
            ops,
            FONT_REGULAR,
            VALUE_SIZE,
            field_box.x,
            field_box.value_y - i as f32 * LINE_HEIGHT,
            line,
        );
    }

    // Ruled line under each value row, filled or not.
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("G", vec![Object::Real(0.6)]));
    ops.push(Operation::new("w", vec![Object::Real(0.5)]));
    for row in 0..field_box.max_lines {
        let y = field_box.value_y - row as f32 * LINE_HEIGHT - 2.5;
        ops.push(Operation::new(
            "m",
            vec![Object::Real(field_box.x), Object::Real(y)],
        ));
        ops.push(Operation::new(
            "l",
            vec![Object::Real(field_box.x + field_box.width), Object::Real(y)],
        ));
        ops.push(Operation::new("S", vec![]));
    }
    ops.push(Operation::new("Q", vec![]));
}

fn compose_signature_band(ops: &mut Vec<Operation>, layout: &PageLayout) {
    for slot in &layout.signatures {
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("G", vec![Object::Real(0.6)]));
        ops.push(Operation::new("w", vec![Object::Real(0.5)]));
        ops.push(Operation::new(
            "re",
            vec![
                Object::Real(slot.rect.x),
                Object::Real(slot.rect.y),
                Object::Real(slot.rect.width),
                Object::Real(slot.rect.height),
            ],
        ));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));

        let label_x = slot.rect.x
            + (slot.rect.width - text_width(&fold_diacritics(&slot.label), LABEL_SIZE)) / 2.0;
        show_text(ops, FONT_BOLD, LABEL_SIZE, label_x, slot.label_y, &slot.label);
    }
}

fn show_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    if text.is_empty() {
        return;
    }
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Real(x), Object::Real(y)],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(
            encode_win_ansi(text),
            StringFormat::Literal,
        )],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn show_text_centered(ops: &mut Vec<Operation>, font: &str, size: f32, y: f32, text: &str) {
    let x = (PAGE_WIDTH - text_width(&fold_diacritics(text), size)) / 2.0;
    show_text(ops, font, size, x.max(0.0), y, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FormRecord {
        FormRecord::new()
            .with("date", "2024-05-01")
            .with("amount", "250.00")
            .with("issued_to", "Jan Kowalski")
            .with("based_on", "faktura 12/2024\nza materiały budowlane")
    }

    #[test]
    fn test_form_document_has_one_page() {
        let schema = FieldSet::payout_voucher();
        let (doc, warnings) =
            build_form_document(&schema, &sample_record(), &Signatures::none()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_form_page_is_a4() {
        let schema = FieldSet::payout_voucher();
        let (doc, _) =
            build_form_document(&schema, &sample_record(), &Signatures::none()).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let media_box = doc
            .get_object(page_id)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(media_box[2].as_float().unwrap(), PAGE_WIDTH);
        assert_eq!(media_box[3].as_float().unwrap(), PAGE_HEIGHT);
    }

    #[test]
    fn test_content_mentions_every_filled_value() {
        let schema = FieldSet::payout_voucher();
        let record = sample_record();
        let (doc, _) = build_form_document(&schema, &record, &Signatures::none()).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("250.00"));
        assert!(text.contains("Jan Kowalski"));
        // Folded multiline value, wrapped but present.
        assert!(text.contains("faktura 12/2024"));
    }

    #[test]
    fn test_deterministic_output() {
        let schema = FieldSet::payout_voucher();
        let (doc_a, _) =
            build_form_document(&schema, &sample_record(), &Signatures::none()).unwrap();
        let (doc_b, _) =
            build_form_document(&schema, &sample_record(), &Signatures::none()).unwrap();
        let mut bytes_a = Vec::new();
        let mut bytes_b = Vec::new();
        let mut doc_a = doc_a;
        let mut doc_b = doc_b;
        doc_a.save_to(&mut bytes_a).unwrap();
        doc_b.save_to(&mut bytes_b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }
}
