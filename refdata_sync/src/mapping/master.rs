//! `security_master` mapper: the one-row-per-security identity table.

use docstore::Document;
use serde_json::Value;

use crate::clean::normalize_string;
use crate::record::{FieldValue, Record};

use super::seal;

fn field<'a>(doc: Option<&'a Document>, name: &str) -> Option<&'a Value> {
    doc.and_then(|d| d.get(name))
}

fn text(doc: Option<&Document>, name: &str) -> Option<String> {
    field(doc, name).and_then(normalize_string)
}

/// Builds the master row for a security.
///
/// The display name prefers the basic document's issuer name, then its
/// description, then the company document's issuer name. Both documents are
/// optional; a master row is written even when neither is present so the
/// identity exists for later partial loads.
pub fn map_security_master(
    isin: &str,
    basic: Option<&Document>,
    company: Option<&Document>,
) -> Record {
    let security_name = text(basic, "ISSUER_NAME")
        .or_else(|| text(basic, "ISIN_DESCRIPTION"))
        .or_else(|| text(company, "ISSUER_NAME"));
    let security_type = text(basic, "SECURITY_TYPE");

    let mut rec = Record::new();
    rec.set("isin_code", FieldValue::Text(isin.to_string()));
    rec.set("security_name", security_name);
    rec.set("security_type", security_type);
    seal(rec)
}
