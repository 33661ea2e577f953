//! Migration orchestrator: drives one full run over the document store.
//!
//! One security at a time, six stages per security, each stage in its own
//! transaction. Stages are independent: a failed or skipped stage logs a
//! `migration_failures` row and the remaining stages still run, so partial
//! source data lands wherever it can. "Done" for a security means every
//! stage was attempted, not that every stage wrote.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use docstore::{Document, DocumentLookup};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::errors::SyncError;
use crate::failures::record_failure;
use crate::mapping::{
    map_basic_info, map_company_info, map_credit_ratings, map_detail_info, map_registrar_info,
    map_security_master,
};
use crate::ratings::upsert_rating;
use crate::reconcile::{self, UpsertOutcome, upsert_and_verify};
use crate::resolve::{EntityKind, resolve_and_link};

/// Source collection holding headline instrument terms.
pub const COLLECTION_BASIC: &str = "isin_basic_info";
/// Source collection holding the attribute long tail.
pub const COLLECTION_DETAIL: &str = "isin_detailed_info";
/// Source collection holding issuer details.
pub const COLLECTION_COMPANY: &str = "isin_company_info";
/// Source collection holding registrar details.
pub const COLLECTION_RTA: &str = "isin_rta_info";
/// Source collection holding ratings; optional, older dumps lack it.
pub const COLLECTION_RATING: &str = "isin_rating_info";

/// Every collection contributing identifiers to a run.
pub const SOURCE_COLLECTIONS: [&str; 5] = [
    COLLECTION_BASIC,
    COLLECTION_DETAIL,
    COLLECTION_COMPANY,
    COLLECTION_RTA,
    COLLECTION_RATING,
];

const PROGRESS_EVERY: usize = 100;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{5,12}$").expect("identifier regex"));

/// Run configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Stop after this many securities (bounded test mode).
    pub limit: Option<usize>,
    /// Attach document snapshots to failure rows.
    pub verbose: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct identifiers found across all source collections.
    pub discovered: usize,
    /// Securities whose stages were all attempted.
    pub processed: usize,
    /// Identifiers rejected by the format gate.
    pub invalid: usize,
    /// Individual stage failures across the whole run.
    pub failed_stages: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "discovered {} securities, processed {}, rejected {} invalid ids, {} failed stages",
            self.discovered, self.processed, self.invalid, self.failed_stages
        )
    }
}

/// The per-security pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Master,
    Company,
    Basic,
    Detail,
    Rta,
    Rating,
}

impl Stage {
    /// Stage name as written into failure rows (the destination table).
    fn name(self) -> &'static str {
        match self {
            Stage::Master => "security_master",
            Stage::Company => "company_info",
            Stage::Basic => "security_basic_info",
            Stage::Detail => "security_detail_info",
            Stage::Rta => "registrar_info",
            Stage::Rating => "credit_ratings",
        }
    }
}

/// What a stage body produced.
enum StageResult {
    /// The stage wrote (or hash-skipped) its record.
    Applied(UpsertOutcome),
    /// Nothing to do; the reason lands in a failure row for auditability.
    Skipped(String),
}

/// Runs one stage body in its own immediate transaction and downgrades
/// every kind of trouble to a failure row. Returns true when the stage
/// counts as failed.
fn run_stage(
    conn: &mut SqliteConnection,
    isin: &str,
    stage: Stage,
    snapshot: Option<&Document>,
    verbose: bool,
    body: impl FnOnce(&mut SqliteConnection) -> anyhow::Result<StageResult>,
) -> bool {
    let result = conn.immediate_transaction(|conn| body(conn));
    match result {
        Ok(StageResult::Applied(outcome)) => {
            if outcome.skipped_unchanged {
                debug!(isin, stage = stage.name(), "unchanged, skipped write");
            }
            if !outcome.verified {
                error!(isin, stage = stage.name(), "row missing after write");
                record_failure(
                    conn,
                    Some(isin),
                    stage.name(),
                    "Failed to insert/update: no rows affected",
                    snapshot,
                    verbose,
                );
                return true;
            }
            false
        }
        Ok(StageResult::Skipped(reason)) => {
            warn!(isin, stage = stage.name(), %reason, "stage skipped");
            record_failure(
                conn,
                Some(isin),
                stage.name(),
                &format!("Skipped: {reason}"),
                snapshot,
                verbose,
            );
            false
        }
        Err(e) => {
            error!(isin, stage = stage.name(), error = %e, "stage failed");
            record_failure(
                conn,
                Some(isin),
                stage.name(),
                &format!("stage error: {e:#}"),
                snapshot,
                verbose,
            );
            true
        }
    }
}

/// Migrates one security end to end. Returns the number of failed stages.
pub fn migrate_security(
    conn: &mut SqliteConnection,
    store: &impl DocumentLookup,
    isin: &str,
    opts: &SyncOptions,
) -> anyhow::Result<usize> {
    let basic = store.find_one(COLLECTION_BASIC, isin)?;
    let detail = store.find_one(COLLECTION_DETAIL, isin)?;
    let company = store.find_one(COLLECTION_COMPANY, isin)?;
    let rta = store.find_one(COLLECTION_RTA, isin)?;
    let rating = if store.collection_exists(COLLECTION_RATING) {
        store.find_one(COLLECTION_RATING, isin)?
    } else {
        None
    };

    debug!(
        isin,
        basic = basic.is_some(),
        detail = detail.is_some(),
        company = company.is_some(),
        rta = rta.is_some(),
        rating = rating.is_some(),
        "documents fetched"
    );

    let mut failed = 0usize;

    // 1. identity row; always written so partial loads have an anchor
    let master_rec = map_security_master(isin, basic.as_ref(), company.as_ref());
    failed += run_stage(conn, isin, Stage::Master, basic.as_ref(), opts.verbose, |c| {
        Ok(StageResult::Applied(upsert_and_verify(
            c,
            &reconcile::SECURITY_MASTER,
            &master_rec,
        )?))
    }) as usize;

    // 2. issuer entity + link
    failed += run_stage(
        conn,
        isin,
        Stage::Company,
        company.as_ref(),
        opts.verbose,
        |c| match &company {
            Some(doc) => {
                let rec = map_company_info(doc);
                match resolve_and_link(c, isin, EntityKind::Issuer, &rec)? {
                    Some(_) => Ok(StageResult::Applied(UpsertOutcome {
                        skipped_unchanged: false,
                        verified: true,
                    })),
                    None => Ok(StageResult::Skipped("no issuer_name".to_string())),
                }
            }
            None => Ok(StageResult::Skipped("no document".to_string())),
        },
    ) as usize;

    // 3. basic info
    failed += run_stage(conn, isin, Stage::Basic, basic.as_ref(), opts.verbose, |c| {
        match &basic {
            Some(doc) => Ok(StageResult::Applied(upsert_and_verify(
                c,
                &reconcile::SECURITY_BASIC_INFO,
                &map_basic_info(isin, doc),
            )?)),
            None => Ok(StageResult::Skipped("no document".to_string())),
        }
    }) as usize;

    // 4. detail info
    failed += run_stage(
        conn,
        isin,
        Stage::Detail,
        detail.as_ref(),
        opts.verbose,
        |c| match &detail {
            Some(doc) => Ok(StageResult::Applied(upsert_and_verify(
                c,
                &reconcile::SECURITY_DETAIL_INFO,
                &map_detail_info(isin, doc),
            )?)),
            None => Ok(StageResult::Skipped("no document".to_string())),
        },
    ) as usize;

    // 5. registrar entity + link
    failed += run_stage(conn, isin, Stage::Rta, rta.as_ref(), opts.verbose, |c| {
        match &rta {
            Some(doc) => {
                let rec = map_registrar_info(doc);
                match resolve_and_link(c, isin, EntityKind::Registrar, &rec)? {
                    Some(_) => Ok(StageResult::Applied(UpsertOutcome {
                        skipped_unchanged: false,
                        verified: true,
                    })),
                    None => Ok(StageResult::Skipped("no rta_name".to_string())),
                }
            }
            None => Ok(StageResult::Skipped("no document".to_string())),
        }
    }) as usize;

    // 6. ratings; older dumps keep the rating fields on the basic document
    let rating_doc = rating.as_ref().or(basic.as_ref());
    failed += run_stage(conn, isin, Stage::Rating, rating_doc, opts.verbose, |c| {
        match rating_doc {
            Some(doc) => {
                let rows = map_credit_ratings(isin, doc);
                if rows.is_empty() {
                    return Ok(StageResult::Skipped(
                        "missing credit_rating or rating_agency".to_string(),
                    ));
                }
                for row in &rows {
                    upsert_rating(c, row)?;
                }
                Ok(StageResult::Applied(UpsertOutcome {
                    skipped_unchanged: false,
                    verified: true,
                }))
            }
            None => Ok(StageResult::Skipped("no document".to_string())),
        }
    }) as usize;

    Ok(failed)
}

/// Runs the full migration: identifier discovery, validation, per-security
/// stages, progress logging.
pub fn run_migration(
    conn: &mut SqliteConnection,
    store: &impl DocumentLookup,
    opts: &SyncOptions,
) -> anyhow::Result<RunSummary> {
    let mut ids = BTreeSet::new();
    for collection in SOURCE_COLLECTIONS {
        if !store.collection_exists(collection) {
            warn!(collection, "source collection missing, skipping");
            continue;
        }
        ids.extend(store.distinct_ids(collection)?);
    }

    let mut summary = RunSummary {
        discovered: ids.len(),
        ..Default::default()
    };
    info!(discovered = summary.discovered, "starting migration run");
    if let Some(limit) = opts.limit {
        info!(limit, "bounded run");
    }

    let take = opts.limit.unwrap_or(usize::MAX);
    for (count, isin) in ids.iter().take(take).enumerate() {
        if !ID_PATTERN.is_match(isin) {
            let err = SyncError::InvalidIdentifier(isin.clone());
            warn!(isin, "invalid identifier, rejected before any write");
            record_failure(
                conn,
                Some(isin),
                "validate",
                &err.to_string(),
                None,
                opts.verbose,
            );
            summary.invalid += 1;
            continue;
        }

        match migrate_security(conn, store, isin, opts) {
            Ok(failed) => summary.failed_stages += failed,
            Err(e) => {
                error!(isin, error = %e, "security could not be processed");
                record_failure(
                    conn,
                    Some(isin),
                    "orchestrate",
                    &format!("unexpected error: {e:#}"),
                    None,
                    opts.verbose,
                );
                summary.failed_stages += 1;
            }
        }
        summary.processed += 1;

        if (count + 1) % PROGRESS_EVERY == 0 {
            info!(processed = count + 1, "progress");
        }
    }

    info!(%summary, "migration run finished");
    Ok(summary)
}
