//! Input and output types for document assembly.
//!
//! The core receives an immutable [`AssemblyInput`] snapshot (form record,
//! signature images, attachment list) and returns an [`AssembledDocument`].
//! Nothing in this module touches UI state or the filesystem; all values
//! are plain byte buffers and strings owned for the duration of one call.

mod assembly;
mod attachment;
mod record;
mod signature;

pub use assembly::{AssembledDocument, AssemblyInput, SkippedAttachment};
pub use attachment::{Attachment, AttachmentKind};
pub use record::FormRecord;
pub use signature::{SignatureImage, Signatures};
