//! Per-table record mappers.
//!
//! Each mapper turns one source document into a [`Record`] for one
//! destination table: a fixed column → source-field → normalizer table.
//! Mappers never touch the database; the reconciler decides what reaches
//! disk. Every record is sealed with a content fingerprint and an
//! `last_updated` stamp before it leaves this module.

mod basic;
mod company;
mod detail;
mod master;
mod rating;
mod rta;

pub use basic::map_basic_info;
pub use company::map_company_info;
pub use detail::map_detail_info;
pub use master::map_security_master;
pub use rating::map_credit_ratings;
pub use rta::map_registrar_info;

use crate::content_hash::record_hash;
use crate::record::{FieldValue, Record};

/// Stamps the bookkeeping columns: `data_hash` over the business columns,
/// `last_updated` at now.
fn seal(mut rec: Record) -> Record {
    let hash = record_hash(&rec);
    rec.set("data_hash", FieldValue::Text(hash));
    rec.set(
        "last_updated",
        FieldValue::Instant(chrono::Utc::now().naive_utc()),
    );
    rec
}
