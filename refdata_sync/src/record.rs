//! Normalized destination rows.
//!
//! A [`Record`] is a column-ordered map of typed field values headed for one
//! destination table. Keeping it dynamic (instead of a struct per table)
//! lets a single reconciliation path serve every table; column names are
//! `&'static str` because the full column vocabulary is fixed at compile
//! time in the mapping module.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;

use docstore::Document;

use crate::clean::{
    DateValue, normalize_boolean, normalize_date, normalize_decimal, normalize_integer,
    normalize_string, normalize_string_max,
};

/// A typed value for one destination column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Full timestamp.
    Instant(NaiveDateTime),
    /// Exact decimal (rates, amounts, yields).
    Decimal(Decimal),
    /// Whole number (lots, counts).
    Integer(i64),
    /// Flag.
    Boolean(bool),
    /// Absent; never overwrites stored data during reconciliation.
    Null,
}

impl FieldValue {
    /// True for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<Decimal>> for FieldValue {
    fn from(v: Option<Decimal>) -> Self {
        v.map(FieldValue::Decimal).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(v: Option<i64>) -> Self {
        v.map(FieldValue::Integer).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(v: Option<bool>) -> Self {
        v.map(FieldValue::Boolean).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<DateValue>> for FieldValue {
    fn from(v: Option<DateValue>) -> Self {
        match v {
            Some(DateValue::Day(d)) => FieldValue::Date(d),
            Some(DateValue::Instant(dt)) => FieldValue::Instant(dt),
            None => FieldValue::Null,
        }
    }
}

/// One destination row: insertion-ordered columns with typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<&'static str, FieldValue>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, replacing any previous value.
    pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) -> &mut Self {
        self.fields.insert(column, value.into());
        self
    }

    /// Value for `column`, if set.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no columns are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text content of `column`, if set to a non-null text value.
    pub fn as_text(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl FromIterator<(&'static str, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (&'static str, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Builds a [`Record`] from a source document, one column at a time.
///
/// Each method reads a raw field from the document, runs the matching
/// normalizer, and stores the typed result (or `Null`) under the given
/// destination column.
pub struct RecordBuilder<'a> {
    doc: &'a Document,
    rec: Record,
}

impl<'a> RecordBuilder<'a> {
    /// Starts a builder over `doc`.
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            rec: Record::new(),
        }
    }

    fn raw(&self, field: &str) -> Value {
        self.doc.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Normalized text column.
    pub fn string(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_string(&self.raw(field));
        self.rec.set(column, v);
        self
    }

    /// Normalized text column truncated to `max_len` characters.
    pub fn string_max(mut self, column: &'static str, field: &str, max_len: usize) -> Self {
        let v = normalize_string_max(&self.raw(field), max_len);
        self.rec.set(column, v);
        self
    }

    /// Date or timestamp column.
    pub fn date(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_date(&self.raw(field));
        self.rec.set(column, v);
        self
    }

    /// Exact decimal column.
    pub fn decimal(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_decimal(&self.raw(field), false);
        self.rec.set(column, v);
        self
    }

    /// Decimal column whose raw text may carry a `%` suffix.
    pub fn percent(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_decimal(&self.raw(field), true);
        self.rec.set(column, v);
        self
    }

    /// Whole-number column.
    pub fn integer(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_integer(&self.raw(field));
        self.rec.set(column, v);
        self
    }

    /// Flag column.
    pub fn boolean(mut self, column: &'static str, field: &str) -> Self {
        let v = normalize_boolean(&self.raw(field));
        self.rec.set(column, v);
        self
    }

    /// Sets a column to an already-computed value.
    pub fn set(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.rec.set(column, value);
        self
    }

    /// Finishes the build.
    pub fn finish(self) -> Record {
        self.rec
    }
}
