//! Signature image buffers.

use crate::error::{Error, Result};
use crate::schema::{SLOT_CASHIER, SLOT_RECIPIENT};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// A captured handwritten signature, held as encoded raster bytes.
///
/// The capture widget exports a canvas data URL (PNG); callers may also
/// supply raw encoded bytes. An empty buffer means no signature was
/// captured, which is a normal state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureImage {
    data: Vec<u8>,
}

impl SignatureImage {
    /// No signature captured.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already-encoded raster bytes (PNG, JPEG, ...).
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI as produced by canvas
    /// `toDataURL()`. An empty string yields an empty signature.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Ok(Self::empty());
        }
        let payload = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| Error::SignatureDecode {
                slot: "data-uri".to_string(),
                reason: "not a base64 data URI".to_string(),
            })?;
        let data = BASE64.decode(payload).map_err(|e| Error::SignatureDecode {
            slot: "data-uri".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { data })
    }

    /// Whether a signature is present.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encoded raster bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// The signature slots of one assembly call.
///
/// The recipient slot only renders when the field set defines it; an empty
/// image in either slot leaves that rectangle blank.
#[derive(Debug, Clone, Default)]
pub struct Signatures {
    pub cashier: SignatureImage,
    pub recipient: SignatureImage,
}

impl Signatures {
    /// No signatures captured.
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolve a schema slot id to its image.
    pub fn for_slot(&self, slot_id: &str) -> &SignatureImage {
        match slot_id {
            SLOT_CASHIER => &self.cashier,
            SLOT_RECIPIENT => &self.recipient,
            _ => {
                // Unknown slot ids render blank rather than panicking.
                static EMPTY: SignatureImage = SignatureImage { data: Vec::new() };
                &EMPTY
            }
        }
    }
}
