//! Form page composition: layout, text rendering, signature embedding.

mod bitmap;
mod layout;
mod page;
mod signature;

pub use bitmap::Bitmap;
pub use layout::{PageLayout, Rect, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
pub use page::build_form_document;
pub use signature::SignatureOverlay;
