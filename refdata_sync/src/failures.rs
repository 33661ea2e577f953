//! Append-only migration failure log.
//!
//! Every contained failure (invalid identifier, skipped stage, store error)
//! lands here so a run can finish and still leave an audit trail. Writing a
//! failure row must never take the run down: errors from the insert itself
//! are logged and swallowed.

use diesel::prelude::*;
use docstore::Document;
use tracing::error;

/// Snapshot text is truncated to keep the error_message column bounded.
const SNAPSHOT_LIMIT: usize = 200;

/// Records one failure row for `stage`.
///
/// In verbose mode a truncated JSON snapshot of the offending document is
/// appended to the message.
pub fn record_failure(
    conn: &mut SqliteConnection,
    isin: Option<&str>,
    stage_name: &str,
    message: &str,
    snapshot: Option<&Document>,
    verbose: bool,
) {
    use crate::schema::migration_failures::dsl::*;

    let mut text = message.to_string();
    if verbose {
        if let Some(doc) = snapshot {
            let mut json = doc.to_json().to_string();
            json.truncate(json.char_indices().nth(SNAPSHOT_LIMIT).map_or(json.len(), |(i, _)| i));
            text.push_str(" | Input: ");
            text.push_str(&json);
        }
    }

    let result = diesel::insert_into(migration_failures)
        .values((
            isin_code.eq(isin),
            stage.eq(stage_name),
            error_message.eq(&text),
        ))
        .execute(conn);

    if let Err(e) = result {
        error!(?isin, stage = stage_name, %e, "could not write failure row");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_truncation_respects_char_boundaries() {
        let long = "é".repeat(300);
        let mut json = long.clone();
        json.truncate(
            json.char_indices()
                .nth(SNAPSHOT_LIMIT)
                .map_or(json.len(), |(i, _)| i),
        );
        assert_eq!(json.chars().count(), SNAPSHOT_LIMIT);
    }
}
