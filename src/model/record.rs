//! Form record: the validated textual field values.

use crate::schema::FieldSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text values of the payout form, keyed by field id.
///
/// Values are rendered exactly as entered; the composer applies no number
/// or date formatting. Unknown keys are tolerated on input and ignored by
/// the composer, so a record written against a wider schema still works.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    values: BTreeMap<String, String>,
}

impl FormRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, returning self for chaining.
    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    /// Get a field value; missing and empty are equivalent.
    pub fn get(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    /// Whether the field has a non-blank value.
    pub fn is_filled(&self, id: &str) -> bool {
        !self.get(id).trim().is_empty()
    }

    /// Ids of required schema fields that are blank, in schema order.
    ///
    /// An empty result means the record passes validation.
    pub fn missing_required(&self, schema: &FieldSet) -> Vec<String> {
        schema
            .fields
            .iter()
            .filter(|f| f.required && !self.is_filled(&f.id))
            .map(|f| f.id.clone())
            .collect()
    }
}
