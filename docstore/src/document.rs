//! The raw per-collection document shape.

use indexmap::IndexMap;
use serde_json::Value;

/// Source field carrying the security identifier in every collection.
pub const ID_FIELD: &str = "ISIN_CODE";

/// One raw document as stored in a source collection: an order-preserving
/// map of upper-case field name to raw JSON value.
///
/// No cleaning happens here; values come back exactly as the scraper wrote
/// them (free-text dates, percentages embedded in prose, and so on).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a parsed JSON object.
    pub fn from_map(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> &mut Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// The security identifier, when the document carries one as a string.
    pub fn security_id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Number of fields in the document.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializes the document back to a JSON object, for diagnostics.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
