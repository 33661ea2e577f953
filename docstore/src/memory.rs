//! In-memory document store used by tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Document, DocumentLookup, Result};

/// Test double holding documents per collection, keyed by security id.
///
/// Documents without a parseable identifier are still stored (they show up
/// in nothing), matching how a real dump can contain junk rows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Document>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document to `collection`, creating the collection if needed.
    pub fn insert(&mut self, collection: &str, doc: Document) -> &mut Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        self
    }
}

impl DocumentLookup for MemoryStore {
    fn find_one(&self, collection: &str, id_value: &str) -> Result<Option<Document>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|d| d.security_id() == Some(id_value))
                .cloned()
        }))
    }

    fn distinct_ids(&self, collection: &str) -> Result<BTreeSet<String>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter_map(|d| d.security_id().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn collection_exists(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }
}
