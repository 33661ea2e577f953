//! The capability the migration engine consumes.

use std::collections::BTreeSet;

use crate::{Document, Result};

/// Point lookups against named document collections.
///
/// Portable surface; the dump-directory implementation lives in
/// [`crate::dump`], the in-memory test double in [`crate::memory`].
pub trait DocumentLookup {
    /// Fetches the single document for `id_value` in `collection`, if any.
    fn find_one(&self, collection: &str, id_value: &str) -> Result<Option<Document>>;

    /// Distinct security identifiers present in `collection`.
    ///
    /// Returned as a `BTreeSet` so callers iterate in a stable order.
    fn distinct_ids(&self, collection: &str) -> Result<BTreeSet<String>>;

    /// True when the named collection exists in the store.
    fn collection_exists(&self, collection: &str) -> bool;
}
