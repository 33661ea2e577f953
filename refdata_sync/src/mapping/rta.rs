//! `registrar_info` mapper: the registrar & transfer agent entity, keyed by
//! its name.

use docstore::Document;

use crate::record::{Record, RecordBuilder};

use super::seal;

/// Builds the registrar row from the `isin_rta_info` document.
pub fn map_registrar_info(doc: &Document) -> Record {
    let rec = RecordBuilder::new(doc)
        .string("rta_name", "RTA_NAME")
        .string("rta_bp_id", "RTA_BP_ID")
        .string("rta_address", "RTA_ADDRESS")
        .string("rta_contact_person", "RTA_CONTACT_PERSON")
        .string("rta_phone", "RTA_PHONE")
        .string("rta_fax", "RTA_FAX")
        .string("rta_email", "RTA_EMAIL")
        .string("arrangers", "ARRANGERS")
        .string("trustee", "TRUSTEE")
        .string("im_term_sheet", "IM_TERM_SHEET")
        .finish();
    seal(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_agent_columns() {
        let doc = Document::from_iter([
            ("ISIN_CODE", json!("INE001A01036")),
            ("RTA_NAME", json!("Registry Services Pvt Ltd")),
            ("TRUSTEE", json!("N.A")),
        ]);
        let rec = map_registrar_info(&doc);
        assert_eq!(rec.as_text("rta_name"), Some("Registry Services Pvt Ltd"));
        assert!(rec.get("trustee").unwrap().is_null());
    }
}
