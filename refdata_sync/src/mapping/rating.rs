//! `credit_ratings` mapper: zero or more rating rows per security.
//!
//! Two source shapes exist side by side in the dumps: a single
//! `CREDIT_RATING` / `RATING_AGENCY` pair (older documents) and the array
//! form `CREDIT_RATINGS` / `RATING_AGENCIES` zipped positionally. A row
//! needs both an agency and a rating value to be usable; anything else is
//! dropped here and surfaces as a stage skip upstream.

use docstore::Document;
use serde_json::Value;

use crate::clean::{normalize_date, normalize_string};
use crate::record::{FieldValue, Record};

use super::seal;

fn rating_row(
    isin: &str,
    agency: String,
    value: String,
    rating_date: &Value,
    outlook: &Value,
) -> Record {
    let mut rec = Record::new();
    rec.set("isin_code", FieldValue::Text(isin.to_string()));
    rec.set("rating_agency", FieldValue::Text(agency));
    rec.set("rating_value", FieldValue::Text(value));
    rec.set("rating_date", normalize_date(rating_date));
    rec.set("outlook", normalize_string(outlook));
    seal(rec)
}

/// Extracts every usable rating row from a rating (or basic) document.
pub fn map_credit_ratings(isin: &str, doc: &Document) -> Vec<Record> {
    let rating_date = doc.get("RATING_DATE").cloned().unwrap_or_default();
    let outlook = doc.get("OUTLOOK").cloned().unwrap_or_default();

    let single_agency = doc.get("RATING_AGENCY").and_then(normalize_string);
    let single_value = doc.get("CREDIT_RATING").and_then(normalize_string);
    if let (Some(agency), Some(value)) = (single_agency, single_value) {
        return vec![rating_row(isin, agency, value, &rating_date, &outlook)];
    }

    let agencies = doc
        .get("RATING_AGENCIES")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let values = doc
        .get("CREDIT_RATINGS")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    agencies
        .iter()
        .zip(values.iter())
        .filter_map(|(a, v)| {
            let agency = normalize_string(a)?;
            let value = normalize_string(v)?;
            Some(rating_row(isin, agency, value, &rating_date, &outlook))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_pair_form() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("RATING_AGENCY", json!("CRISIL")),
            ("CREDIT_RATING", json!("AA+")),
            ("OUTLOOK", json!("Stable")),
            ("RATING_DATE", json!("05-03-2024")),
        ]);
        let rows = map_credit_ratings("INE001A01036", &doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_text("rating_agency"), Some("CRISIL"));
        assert_eq!(rows[0].as_text("rating_value"), Some("AA+"));
        assert_eq!(rows[0].as_text("outlook"), Some("Stable"));
        assert!(matches!(rows[0].get("rating_date"), Some(FieldValue::Date(_))));
    }

    #[test]
    fn array_form_zips_and_drops_incomplete_pairs() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("RATING_AGENCIES", json!(["CRISIL", "ICRA", "-"])),
            ("CREDIT_RATINGS", json!(["AA+", "AA", "AA-"])),
        ]);
        let rows = map_credit_ratings("INE001A01036", &doc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_text("rating_agency"), Some("ICRA"));
        assert_eq!(rows[1].as_text("rating_value"), Some("AA"));
    }

    #[test]
    fn missing_agency_or_value_yields_nothing() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("CREDIT_RATING", json!("AA+")),
        ]);
        assert!(map_credit_ratings("INE001A01036", &doc).is_empty());
    }
}
