//! Shared fixtures for integration tests.
#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use paydoc::{Attachment, FormRecord};

/// A filled record passing validation.
pub fn valid_record() -> FormRecord {
    FormRecord::new()
        .with("date", "2024-05-01")
        .with("amount", "250.00")
        .with("issued_to", "Jan Kowalski")
        .with("department_name", "Dział młodzieżowy")
        .with("based_on", "faktura 12/2024 za materiały")
        .with("amount_in_words", "dwieście pięćdziesiąt złotych")
        .with("cashier", "Anna Nowak")
}

/// Encode an opaque gradient image as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 120])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A PNG truncated beyond recovery.
pub fn corrupt_png() -> Vec<u8> {
    let mut data = png_bytes(32, 32);
    data.truncate(24);
    data
}

/// Bytes with a PDF header but no readable structure.
pub fn corrupt_pdf() -> Vec<u8> {
    b"%PDF-1.7\nthis is not a real document".to_vec()
}

/// Build a simple PDF with `pages` pages of the given width.
pub fn pdf_bytes(pages: usize, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for i in 0..pages {
        let text = format!("BT /F1 12 Tf 72 720 Td (page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(842),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => "Helvetica",
                    },
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(pages as i64),
            "Kids" => kids,
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

/// Wrap bytes as an image/png attachment.
pub fn png_attachment(name: &str, data: Vec<u8>) -> Attachment {
    Attachment::new(name, "image/png", data)
}

/// Wrap bytes as an application/pdf attachment.
pub fn pdf_attachment(name: &str, data: Vec<u8>) -> Attachment {
    Attachment::new(name, "application/pdf", data)
}

/// Page widths of a saved document, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<f32> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
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
            media_box[2].as_float().unwrap()
        })
        .collect()
}
