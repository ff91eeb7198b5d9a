//! # paydoc
//!
//! Deterministic payout-receipt PDF assembly for Rust.
//!
//! This library takes a filled payout form, up to two captured handwritten
//! signatures, and an ordered list of receipt attachments (images or PDFs),
//! and produces a single self-contained PDF: the rendered form page first,
//! then every attachment normalized into the page sequence.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paydoc::{assemble, AssemblyInput, Attachment, FormRecord};
//!
//! fn main() -> paydoc::Result<()> {
//!     let record = FormRecord::new()
//!         .with("date", "2024-05-01")
//!         .with("amount", "250.00")
//!         .with("issued_to", "Jan Kowalski");
//!
//!     let receipt = std::fs::read("receipt.jpg")?;
//!     let input = AssemblyInput::new(record)
//!         .with_attachment(Attachment::new("receipt.jpg", "image/jpeg", receipt));
//!
//!     let document = assemble(&input)?;
//!     std::fs::write("payout.pdf", &document.bytes)?;
//!     for warning in &document.warnings {
//!         eprintln!("skipped {}: {}", warning.name, warning.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - **Validation first**: assembly refuses to start while a required field
//!   is blank, and no partial document is ever produced.
//! - **Partial-failure tolerance**: a corrupt image or unparsable PDF
//!   attachment is skipped with a warning; one bad receipt never blocks
//!   the rest of the document. Only validation and serialization failures
//!   abort a run.
//! - **Order preservation**: attachment page groups appear in exactly the
//!   order the attachments were supplied.
//! - **Determinism**: byte-identical inputs yield byte-identical output —
//!   no timestamps, no random identifiers.

pub mod assemble;
pub mod compose;
pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod schema;

// Re-export commonly used types
pub use assemble::AssembleOptions;
pub use detect::{detect_format, is_image_bytes, is_pdf_bytes, AttachmentFormat};
pub use error::{Error, Result};
pub use model::{
    AssembledDocument, AssemblyInput, Attachment, AttachmentKind, FormRecord, SignatureImage,
    Signatures, SkippedAttachment,
};
pub use schema::{FieldDef, FieldSet, SignatureSlotDef, SLOT_CASHIER, SLOT_RECIPIENT};

/// Assemble a payout document with default options.
///
/// Equivalent to [`assemble_with_options`] with [`AssembleOptions::default`].
pub fn assemble(input: &AssemblyInput) -> Result<AssembledDocument> {
    assemble_with_options(input, &AssembleOptions::default())
}

/// Assemble a payout document with custom options.
///
/// # Example
///
/// ```no_run
/// use paydoc::{assemble_with_options, AssembleOptions, AssemblyInput, FieldSet, FormRecord};
///
/// let input = AssemblyInput::new(
///     FormRecord::new()
///         .with("date", "2024-05-01")
///         .with("amount", "100")
///         .with("issued_to", "Anna Nowak"),
/// );
/// let options = AssembleOptions::new()
///     .with_schema(FieldSet::payout_voucher().single_signature())
///     .sequential();
/// let document = assemble_with_options(&input, &options).unwrap();
/// assert_eq!(document.page_count, 1);
/// ```
pub fn assemble_with_options(
    input: &AssemblyInput,
    options: &AssembleOptions,
) -> Result<AssembledDocument> {
    assemble::run(input, options)
}
