//! `company_info` mapper: the issuer entity, keyed by its name.

use docstore::Document;

use crate::record::{Record, RecordBuilder};

use super::seal;

/// Builds the issuer row from the `isin_company_info` document.
///
/// `issuer_name` is the natural key; the entity resolver refuses to link a
/// record whose key column is null.
pub fn map_company_info(doc: &Document) -> Record {
    let rec = RecordBuilder::new(doc)
        .string("issuer_name", "ISSUER_NAME")
        .string("issuer_address", "ISSUER_ADDRESS")
        .string("issuer_type", "ISSUER_TYPE")
        .string("issuer_state", "ISSUER_STATE")
        .string("issuer_website", "ISSUER_WEBSITE")
        .string("contact_person", "CONTACT_PERSON")
        .string("phone_number", "PHONE_NUMBER")
        .string("fax_number", "FAX_NUMBER")
        .string("email_id", "EMAIL_ID")
        .string("guaranteed_by", "GUARANTEED_BY")
        .string("registrar", "REGISTRAR")
        .string("industry_group", "INDUSTRY_GROUP")
        .string("macro_sector", "MACRO_SECTOR")
        .string("micro_industry", "MICRO_INDUSTRY")
        .string("product_service_activity", "PRODUCT_SERVICE_ACTIVITY")
        .string("sector", "SECTOR")
        .string("security_code", "SECURITY_CODE")
        .finish();
    seal(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn natural_key_and_contact_columns() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("ISSUER_NAME", json!("  Acme Infra Ltd  ")),
            ("EMAIL_ID", json!("ir@acme.example")),
            ("SECTOR", json!("-")),
        ]);
        let rec = map_company_info(&doc);
        assert_eq!(rec.as_text("issuer_name"), Some("Acme Infra Ltd"));
        assert_eq!(rec.as_text("email_id"), Some("ir@acme.example"));
        assert!(rec.get("sector").unwrap().is_null());
        assert!(rec.get("data_hash").is_some());
    }
}
