mod common;
use common::{assert_sqlite_pragmas, count, fk_check_empty, setup_db};

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::Nullable;
use diesel::sql_types::Text;

use refdata_sync::reconcile::{
    SECURITY_BASIC_INFO, SECURITY_MASTER, fetch_data_hash, upsert_and_verify, upsert_record,
};
use refdata_sync::record::{FieldValue, Record};

#[derive(QueryableByName)]
struct MasterRow {
    #[diesel(sql_type = Nullable<Text>)]
    security_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    security_type: Option<String>,
}

fn master_record(name: Option<&str>, kind: Option<&str>, hash: &str) -> Record {
    [
        ("isin_code", FieldValue::Text("INE001A01036".into())),
        (
            "security_name",
            name.map(|s| FieldValue::Text(s.into()))
                .unwrap_or(FieldValue::Null),
        ),
        (
            "security_type",
            kind.map(|s| FieldValue::Text(s.into()))
                .unwrap_or(FieldValue::Null),
        ),
        ("data_hash", FieldValue::Text(hash.into())),
        (
            "last_updated",
            FieldValue::Instant(chrono::Utc::now().naive_utc()),
        ),
    ]
    .into_iter()
    .collect()
}

fn read_master(conn: &mut SqliteConnection) -> MasterRow {
    diesel::sql_query(
        "SELECT security_name, security_type FROM security_master WHERE isin_code = 'INE001A01036'",
    )
    .get_result(conn)
    .unwrap()
}

#[test]
fn null_candidate_never_erases_stored_value() {
    let (_db, mut conn) = setup_db();
    assert_sqlite_pragmas(&mut conn);

    upsert_record(
        &mut conn,
        &SECURITY_MASTER,
        &master_record(Some("Acme Infra Ltd"), Some("Debenture"), "h1"),
    )
    .unwrap();

    // second sighting carries no name; the stored one must survive
    upsert_record(
        &mut conn,
        &SECURITY_MASTER,
        &master_record(None, Some("Bond"), "h2"),
    )
    .unwrap();

    let row = read_master(&mut conn);
    assert_eq!(row.security_name.as_deref(), Some("Acme Infra Ltd"));
    assert_eq!(row.security_type.as_deref(), Some("Bond"));
    assert_eq!(count(&mut conn, "security_master"), 1);
    fk_check_empty(&mut conn);
}

#[test]
fn reapplying_the_same_record_is_idempotent() {
    let (_db, mut conn) = setup_db();

    let rec = master_record(Some("Acme Infra Ltd"), Some("Debenture"), "h1");
    upsert_record(&mut conn, &SECURITY_MASTER, &rec).unwrap();
    upsert_record(&mut conn, &SECURITY_MASTER, &rec).unwrap();
    upsert_record(&mut conn, &SECURITY_MASTER, &rec).unwrap();

    let row = read_master(&mut conn);
    assert_eq!(row.security_name.as_deref(), Some("Acme Infra Ltd"));
    assert_eq!(count(&mut conn, "security_master"), 1);
}

#[test]
fn unchanged_hash_skips_the_write() {
    let (_db, mut conn) = setup_db();

    let rec = master_record(Some("Acme Infra Ltd"), None, "h1");
    let first = upsert_and_verify(&mut conn, &SECURITY_MASTER, &rec).unwrap();
    assert!(!first.skipped_unchanged);
    assert!(first.verified);

    let second = upsert_and_verify(&mut conn, &SECURITY_MASTER, &rec).unwrap();
    assert!(second.skipped_unchanged);
    assert!(second.verified);

    assert_eq!(
        fetch_data_hash(&mut conn, &SECURITY_MASTER, &rec).unwrap(),
        Some("h1".to_string())
    );
}

#[test]
fn changed_hash_writes_and_bookkeeping_tracks_latest_sighting() {
    let (_db, mut conn) = setup_db();

    upsert_and_verify(
        &mut conn,
        &SECURITY_MASTER,
        &master_record(Some("Acme Infra Ltd"), None, "h1"),
    )
    .unwrap();
    let out = upsert_and_verify(
        &mut conn,
        &SECURITY_MASTER,
        &master_record(None, Some("Bond"), "h2"),
    )
    .unwrap();
    assert!(!out.skipped_unchanged);

    // data_hash is overwrite-on-write, not coalesced
    let rec = master_record(None, None, "ignored");
    assert_eq!(
        fetch_data_hash(&mut conn, &SECURITY_MASTER, &rec).unwrap(),
        Some("h2".to_string())
    );
}

#[test]
fn basic_info_row_needs_master_parent() {
    let (_db, mut conn) = setup_db();

    upsert_record(
        &mut conn,
        &SECURITY_MASTER,
        &master_record(Some("Acme Infra Ltd"), None, "h1"),
    )
    .unwrap();

    let basic: Record = [
        ("isin_code", FieldValue::Text("INE001A01036".into())),
        (
            "coupon_rate_percent",
            FieldValue::Decimal("8.40".parse().unwrap()),
        ),
        ("coupon_rate_class", FieldValue::Text("fixed".into())),
        ("data_hash", FieldValue::Text("b1".into())),
        (
            "last_updated",
            FieldValue::Instant(chrono::Utc::now().naive_utc()),
        ),
    ]
    .into_iter()
    .collect();
    let out = upsert_and_verify(&mut conn, &SECURITY_BASIC_INFO, &basic).unwrap();
    assert!(out.verified);
    assert_eq!(count(&mut conn, "security_basic_info"), 1);
    fk_check_empty(&mut conn);
}
