//! Image attachments as single A4 pages.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::NormalizedAttachment;
use crate::compose::{Bitmap, Rect, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{Error, Result};
use crate::model::Attachment;

/// Whitespace kept around a normalized receipt image.
const IMAGE_MARGIN: f32 = 24.0;

/// Build a one-page document with the image scaled to fit and centered.
pub fn build(attachment: &Attachment) -> Result<NormalizedAttachment> {
    let bitmap = Bitmap::decode(&attachment.data).map_err(|e| Error::ImageDecode {
        name: attachment.name.clone(),
        reason: e.to_string(),
    })?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let xobject_id = bitmap.add_to(&mut doc)?;

    let frame = Rect::new(
        IMAGE_MARGIN,
        IMAGE_MARGIN,
        PAGE_WIDTH - 2.0 * IMAGE_MARGIN,
        PAGE_HEIGHT - 2.0 * IMAGE_MARGIN,
    );
    let (width, height) = frame.fit(bitmap.width() as f32, bitmap.height() as f32);
    let (x, y) = frame.center_origin(width, height);

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(width),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(height),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
        Operation::new("Q", vec![]),
    ];
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

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
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => Object::Reference(xobject_id),
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    Ok(NormalizedAttachment {
        name: attachment.name.clone(),
        doc,
        page_count: 1,
    })
}
