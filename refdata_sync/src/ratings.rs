//! Credit-rating history repo.
//!
//! Ratings accumulate: each distinct (isin, agency, value, date) tuple is
//! its own row. SQLite's UNIQUE treats NULLs as distinct, so a plain upsert
//! would pile up duplicates for date-less ratings; the lookup here compares
//! the date null-safely and only inserts when no matching tuple exists.

use anyhow::Context;
use diesel::prelude::*;
use tracing::debug;

use crate::errors::SyncError;
use crate::record::{FieldValue, Record};

fn date_text(value: Option<&FieldValue>) -> Option<String> {
    match value {
        Some(FieldValue::Date(d)) => Some(d.to_string()),
        Some(FieldValue::Instant(dt)) => Some(dt.date().to_string()),
        _ => None,
    }
}

fn instant_text(value: Option<&FieldValue>) -> Option<String> {
    match value {
        Some(FieldValue::Instant(dt)) => {
            Some(dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
        }
        _ => None,
    }
}

/// Inserts or refreshes one rating row built by the rating mapper.
///
/// On a match only `outlook`, `data_hash` and `last_updated` change, and a
/// null candidate outlook keeps the stored one.
pub fn upsert_rating(conn: &mut SqliteConnection, rec: &Record) -> anyhow::Result<()> {
    use crate::schema::credit_ratings::dsl::*;

    let isin = rec
        .as_text("isin_code")
        .ok_or(SyncError::MissingRatingField("isin_code"))?;
    let agency = rec
        .as_text("rating_agency")
        .ok_or(SyncError::MissingRatingField("rating_agency"))?;
    let value = rec
        .as_text("rating_value")
        .ok_or(SyncError::MissingRatingField("rating_value"))?;
    let date = date_text(rec.get("rating_date"));
    let candidate_outlook = rec.as_text("outlook").map(str::to_string);
    let candidate_hash = rec.as_text("data_hash").map(str::to_string);
    let stamp = instant_text(rec.get("last_updated"));

    let base = credit_ratings
        .filter(isin_code.eq(isin))
        .filter(rating_agency.eq(agency))
        .filter(rating_value.eq(value));
    let existing: Option<(Option<i32>, Option<String>)> = match &date {
        Some(d) => base
            .filter(rating_date.eq(d))
            .select((id, outlook))
            .first(conn)
            .optional(),
        None => base
            .filter(rating_date.is_null())
            .select((id, outlook))
            .first(conn)
            .optional(),
    }
    .with_context(|| format!("look up rating for {isin}/{agency}"))?;

    match existing {
        Some((row_id, stored_outlook)) => {
            let merged_outlook = candidate_outlook.or(stored_outlook);
            diesel::update(credit_ratings.filter(id.eq(row_id)))
                .set((
                    outlook.eq(merged_outlook),
                    data_hash.eq(candidate_hash),
                    last_updated.eq(stamp),
                ))
                .execute(conn)
                .with_context(|| format!("refresh rating for {isin}/{agency}"))?;
            debug!(isin, agency, value, "rating tuple refreshed");
        }
        None => {
            diesel::insert_into(credit_ratings)
                .values((
                    isin_code.eq(isin),
                    rating_agency.eq(agency),
                    rating_value.eq(value),
                    rating_date.eq(date),
                    outlook.eq(candidate_outlook),
                    data_hash.eq(candidate_hash),
                    last_updated.eq(stamp),
                ))
                .execute(conn)
                .with_context(|| format!("insert rating for {isin}/{agency}"))?;
            debug!(isin, agency, value, "rating tuple inserted");
        }
    }
    Ok(())
}
