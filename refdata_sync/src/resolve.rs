//! Issuer / registrar entity resolution.
//!
//! Companies and registrar agents are shared entities deduplicated by their
//! natural key (the name). Resolution upserts the entity row, takes the
//! surrogate id from `RETURNING`, and links the security to it through the
//! relevant map table with an idempotent `ON CONFLICT DO NOTHING` insert.

use anyhow::Context;
use diesel::prelude::*;
use tracing::{debug, warn};

use crate::reconcile::{self, TableSpec, upsert_record_returning_id};
use crate::record::Record;

/// Which shared entity a record resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// The issuing company, keyed by `issuer_name`.
    Issuer,
    /// The registrar & transfer agent, keyed by `rta_name`.
    Registrar,
}

impl EntityKind {
    fn table_spec(self) -> &'static TableSpec {
        match self {
            EntityKind::Issuer => &reconcile::COMPANY_INFO,
            EntityKind::Registrar => &reconcile::REGISTRAR_INFO,
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            EntityKind::Issuer => "company_id",
            EntityKind::Registrar => "rta_id",
        }
    }

    fn natural_key(self) -> &'static str {
        match self {
            EntityKind::Issuer => "issuer_name",
            EntityKind::Registrar => "rta_name",
        }
    }
}

/// Upserts the entity behind `record` and links `isin` to it.
///
/// Returns the surrogate id, or `None` when the record has no natural key
/// (the caller turns that into a stage skip). The link insert is a typed
/// Diesel statement; re-linking the same pair is a no-op.
pub fn resolve_and_link(
    conn: &mut SqliteConnection,
    isin: &str,
    kind: EntityKind,
    record: &Record,
) -> anyhow::Result<Option<i64>> {
    if record
        .as_text(kind.natural_key())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .is_none()
    {
        warn!(isin, key = kind.natural_key(), "entity record has no natural key");
        return Ok(None);
    }

    let spec = kind.table_spec();
    let entity_id = upsert_record_returning_id(conn, spec, record, kind.id_column())?;
    debug!(isin, table = spec.table, entity_id, "resolved entity");

    let link = link_key(entity_id)?;
    match kind {
        EntityKind::Issuer => link_company(conn, isin, link)?,
        EntityKind::Registrar => link_registrar(conn, isin, link)?,
    }
    Ok(Some(entity_id))
}

/// Narrows a `RETURNING` id to the map tables' integer key type.
fn link_key(entity_id: i64) -> anyhow::Result<i32> {
    i32::try_from(entity_id).with_context(|| format!("entity id {entity_id} out of range"))
}

fn link_company(conn: &mut SqliteConnection, isin: &str, id: i32) -> anyhow::Result<()> {
    use crate::schema::security_company_map::dsl::*;

    diesel::insert_into(security_company_map)
        .values((
            isin_code.eq(isin),
            company_id.eq(id),
            primary_company.eq(true),
        ))
        .on_conflict((isin_code, company_id))
        .do_nothing()
        .execute(conn)
        .with_context(|| format!("link {isin} to company {id}"))?;
    Ok(())
}

fn link_registrar(conn: &mut SqliteConnection, isin: &str, id: i32) -> anyhow::Result<()> {
    use crate::schema::security_registrar_map::dsl::*;

    let today = chrono::Utc::now().date_naive().to_string();
    diesel::insert_into(security_registrar_map)
        .values((isin_code.eq(isin), rta_id.eq(id), effective_from.eq(today)))
        .on_conflict((isin_code, rta_id, effective_from))
        .do_nothing()
        .execute(conn)
        .with_context(|| format!("link {isin} to registrar {id}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_key_rejects_out_of_range_ids() {
        assert_eq!(link_key(42).unwrap(), 42);
        assert!(link_key(i64::from(i32::MAX) + 1).is_err());
    }
}
