//! Content fingerprint for change detection.
//!
//! The hash covers the business columns of a record in sorted column order,
//! excluding the bookkeeping columns (`data_hash` itself and the
//! `last_updated` stamp, which changes on every run). Two records with the
//! same business content therefore hash identically across runs, which lets
//! the reconciler skip writes for unchanged securities.

use sha2::{Digest, Sha256};

use crate::record::{FieldValue, Record};

/// Columns excluded from the fingerprint.
const BOOKKEEPING_COLUMNS: [&str; 2] = ["data_hash", "last_updated"];

/// Canonical text form of a field value for hashing. The type prefix keeps
/// e.g. text `"1"` and integer `1` from colliding.
fn canonical(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => format!("t:{s}"),
        FieldValue::Date(d) => format!("d:{d}"),
        FieldValue::Instant(dt) => format!("i:{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
        FieldValue::Decimal(d) => format!("n:{}", d.normalize()),
        FieldValue::Integer(n) => format!("n:{n}"),
        FieldValue::Boolean(b) => format!("b:{b}"),
        FieldValue::Null => "~".to_string(),
    }
}

/// Hex-encoded SHA-256 fingerprint of a record's business columns.
pub fn record_hash(record: &Record) -> String {
    let mut columns: Vec<&str> = record
        .columns()
        .filter(|c| !BOOKKEEPING_COLUMNS.contains(c))
        .collect();
    columns.sort_unstable();

    let mut hasher = Sha256::new();
    for col in columns {
        hasher.update(col.as_bytes());
        hasher.update([0u8]);
        if let Some(v) = record.get(col) {
            hasher.update(canonical(v).as_bytes());
        }
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rec(pairs: Vec<(&'static str, FieldValue)>) -> Record {
        pairs.into_iter().collect()
    }

    #[test]
    fn column_order_does_not_matter() {
        let a = rec(vec![
            ("isin_code", FieldValue::Text("INE001A01036".into())),
            ("face_value", FieldValue::Decimal(Decimal::new(1000, 0))),
        ]);
        let b = rec(vec![
            ("face_value", FieldValue::Decimal(Decimal::new(1000, 0))),
            ("isin_code", FieldValue::Text("INE001A01036".into())),
        ]);
        assert_eq!(record_hash(&a), record_hash(&b));
    }

    #[test]
    fn bookkeeping_columns_do_not_affect_hash() {
        let a = rec(vec![
            ("isin_code", FieldValue::Text("INE001A01036".into())),
            ("data_hash", FieldValue::Text("aaaa".into())),
            (
                "last_updated",
                FieldValue::Instant(chrono::Utc::now().naive_utc()),
            ),
        ]);
        let b = rec(vec![("isin_code", FieldValue::Text("INE001A01036".into()))]);
        assert_eq!(record_hash(&a), record_hash(&b));
    }

    #[test]
    fn value_and_type_changes_change_the_hash() {
        let base = rec(vec![("market_lot", FieldValue::Integer(1))]);
        let other = rec(vec![("market_lot", FieldValue::Integer(2))]);
        let text = rec(vec![("market_lot", FieldValue::Text("1".into()))]);
        assert_ne!(record_hash(&base), record_hash(&other));
        assert_ne!(record_hash(&base), record_hash(&text));
    }

    #[test]
    fn trailing_decimal_zeros_are_insignificant() {
        let a = rec(vec![(
            "coupon_rate_percent",
            FieldValue::Decimal("8.40".parse().unwrap()),
        )]);
        let b = rec(vec![(
            "coupon_rate_percent",
            FieldValue::Decimal("8.4".parse().unwrap()),
        )]);
        assert_eq!(record_hash(&a), record_hash(&b));
    }
}
