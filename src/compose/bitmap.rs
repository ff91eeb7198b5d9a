//! Raster bitmaps as PDF image XObjects.
//!
//! Shared by the signature embedder and the attachment normalizer: both
//! decode an encoded raster into RGB samples (plus an alpha soft mask when
//! the source has transparency) and register it as a FlateDecode image
//! XObject in the target document.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

use crate::error::Result;

/// Decoded raster image ready for embedding.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Bitmap {
    /// Decode encoded raster bytes (PNG, JPEG, ...).
    pub fn decode(data: &[u8]) -> image::ImageResult<Self> {
        let img = image::load_from_memory(data)?;
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixel_count = width as usize * height as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        let mut translucent = false;
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
            translucent |= a != u8::MAX;
        }

        Ok(Self {
            width,
            height,
            rgb,
            // Fully opaque images need no soft mask.
            alpha: translucent.then_some(alpha),
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Register this bitmap as an image XObject in `doc` and return its id.
    pub fn add_to(&self, doc: &mut Document) -> Result<ObjectId> {
        let smask_id = match &self.alpha {
            Some(alpha) => {
                let stream = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => self.width as i64,
                        "Height" => self.height as i64,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                        "Filter" => "FlateDecode",
                    },
                    deflate(alpha)?,
                );
                Some(doc.add_object(stream))
            }
            None => None,
        };

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        if let Some(id) = smask_id {
            dict.set("SMask", Object::Reference(id));
        }
        Ok(doc.add_object(Stream::new(dict, deflate(&self.rgb)?)))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
