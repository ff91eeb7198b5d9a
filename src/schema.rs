//! Form schema definition.
//!
//! The two observed variants of the payout form (one with a single
//! signature line, one with two, with differing label copy) are folded
//! into a single data-driven field set. Both the form UI and the page
//! composer consume the same [`FieldSet`]; label language and signature
//! slot count are data, not code.

use serde::{Deserialize, Serialize};

/// Well-known slot id for the cashier signature.
pub const SLOT_CASHIER: &str = "cashier";
/// Well-known slot id for the optional recipient signature.
pub const SLOT_RECIPIENT: &str = "recipient";

/// One text field of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Stable identifier, used as the key into the form record.
    pub id: String,

    /// Label printed next to the value.
    pub label: String,

    /// Whether assembly refuses to start when the value is empty.
    #[serde(default)]
    pub required: bool,

    /// Whether the value may wrap over several lines.
    #[serde(default)]
    pub multiline: bool,

    /// Line count reserved for a multiline value (ignored otherwise).
    #[serde(default = "default_rows")]
    pub rows: u8,
}

fn default_rows() -> u8 {
    1
}

impl FieldDef {
    /// Single-line field.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            required: false,
            multiline: false,
            rows: 1,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Make the field multiline with the given row count.
    pub fn multiline(mut self, rows: u8) -> Self {
        self.multiline = true;
        self.rows = rows.max(1);
        self
    }
}

/// One handwritten-signature slot on the form page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSlotDef {
    /// Slot identifier ([`SLOT_CASHIER`] or [`SLOT_RECIPIENT`]).
    pub id: String,

    /// Label printed under the signature rectangle.
    pub label: String,
}

/// Complete description of the payout form: title lines, ordered text
/// fields, and signature slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// Document title, rendered centered at the top of the page.
    pub title: String,

    /// Organization line rendered under the title.
    #[serde(default)]
    pub subtitle: String,

    /// Text fields in render order.
    pub fields: Vec<FieldDef>,

    /// Signature slots in render order (one or two).
    pub signatures: Vec<SignatureSlotDef>,
}

impl FieldSet {
    /// The built-in payout-voucher field set, matching the on-screen form.
    pub fn payout_voucher() -> Self {
        Self {
            title: "Dowód wypłaty".to_string(),
            subtitle: "Zbór Chrześcijan Baptystów \u{ab}Boża Łaska\u{bb} w Warszawie".to_string(),
            fields: vec![
                FieldDef::new("date", "Data").required(),
                FieldDef::new("amount", "Kwota").required(),
                FieldDef::new("issued_to", "Wydano (imię nazwisko)").required(),
                FieldDef::new(
                    "account_info",
                    "Konto dla przelewu (numer telefonu lub konto bankowe)",
                ),
                FieldDef::new("department_name", "Nazwa działu"),
                FieldDef::new("based_on", "Na podstawie").multiline(3),
                FieldDef::new("amount_in_words", "Kwota słownie").multiline(3),
                FieldDef::new("cashier", "Kasjer"),
            ],
            signatures: vec![
                SignatureSlotDef {
                    id: SLOT_CASHIER.to_string(),
                    label: "Podpis kasjera".to_string(),
                },
                SignatureSlotDef {
                    id: SLOT_RECIPIENT.to_string(),
                    label: "Podpis odbiorcy".to_string(),
                },
            ],
        }
    }

    /// Drop the recipient slot, producing the single-signature variant.
    pub fn single_signature(mut self) -> Self {
        self.signatures.retain(|s| s.id == SLOT_CASHIER);
        self
    }

    /// Ids of all required fields, in field order.
    pub fn required_ids(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.id.as_str())
            .collect()
    }

    /// Look up a field definition by id.
    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::payout_voucher()
    }
}
