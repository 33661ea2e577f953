//! Typed errors for the migration pipeline.
//!
//! Repository plumbing stays on `anyhow`; these cover the cases whose
//! message is written verbatim into `migration_failures` rows or that a
//! caller may want to match on.

use thiserror::Error;

/// Domain errors raised while migrating one security.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The identifier failed the format gate; nothing was written.
    #[error("Invalid identifier format: {0}")]
    InvalidIdentifier(String),

    /// A rating record arrived without a column its tuple key needs.
    #[error("rating record missing {0}")]
    MissingRatingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_value() {
        assert_eq!(
            SyncError::InvalidIdentifier("A$BAD".to_string()).to_string(),
            "Invalid identifier format: A$BAD"
        );
        assert_eq!(
            SyncError::MissingRatingField("rating_agency").to_string(),
            "rating record missing rating_agency"
        );
    }
}
