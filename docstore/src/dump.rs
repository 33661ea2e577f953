//! Dump-directory implementation of [`DocumentLookup`].
//!
//! ## Layout
//! One `<collection>.jsonl` file per collection (mongoexport line format):
//! each line a JSON object, field names upper-case, identifier in
//! `ISIN_CODE`. The whole directory is loaded eagerly; per-security document
//! counts are bounded (one document per collection), so memory stays small
//! relative to the dump itself.
//!
//! Malformed lines are skipped, not fatal: a partially corrupt dump should
//! still migrate every readable security.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::{Document, DocumentLookup, Error, Result};

/// A document store loaded from a directory of JSONL dump files.
#[derive(Debug, Default)]
pub struct DumpStore {
    collections: BTreeMap<String, Collection>,
}

#[derive(Debug, Default)]
struct Collection {
    by_id: BTreeMap<String, Document>,
    skipped_lines: usize,
}

impl DumpStore {
    /// Loads every `*.jsonl` file under `dir`; the file stem is the
    /// collection name.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::default();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let collection = Self::load_file(name, &path)?;
            store.collections.insert(name.to_string(), collection);
        }
        Ok(store)
    }

    fn load_file(name: &str, path: &Path) -> Result<Collection> {
        let mut col = Collection::default();
        let reader = BufReader::new(fs::File::open(path)?);
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(obj)) => {
                    let fields: IndexMap<String, Value> = obj.into_iter().collect();
                    let doc = Document::from_map(fields);
                    match doc.security_id() {
                        // last sighting wins within one dump file
                        Some(id) => {
                            col.by_id.insert(id.to_string(), doc);
                        }
                        None => {
                            warn!(
                                collection = name,
                                line = idx + 1,
                                "skipping document without an identifier"
                            );
                            col.skipped_lines += 1;
                        }
                    }
                }
                Ok(_) => {
                    let err = Error::NotAnObject(name.to_string());
                    warn!(%err, line = idx + 1, "skipping dump line");
                    col.skipped_lines += 1;
                }
                Err(_) => {
                    let err = Error::MalformedDocument {
                        collection: name.to_string(),
                        line: idx + 1,
                    };
                    warn!(%err, "skipping dump line");
                    col.skipped_lines += 1;
                }
            }
        }
        Ok(col)
    }

    /// Number of unreadable or identifier-less lines seen in `collection`.
    pub fn skipped_lines(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.skipped_lines)
            .unwrap_or(0)
    }

    /// Names of the loaded collections.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl DocumentLookup for DumpStore {
    fn find_one(&self, collection: &str, id_value: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.by_id.get(id_value))
            .cloned())
    }

    fn distinct_ids(&self, collection: &str) -> Result<BTreeSet<String>> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| c.by_id.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn collection_exists(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dump(dir: &Path, name: &str, lines: &[&str]) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        for l in lines {
            writeln!(f, "{l}").unwrap();
        }
    }

    #[test]
    fn loads_jsonl_and_skips_junk() {
        let dir = tempfile::tempdir().unwrap();
        write_dump(
            dir.path(),
            "isin_basic_info.jsonl",
            &[
                r#"{"ISIN_CODE":"INE001A01036","SECURITY_TYPE":"Debenture"}"#,
                "not json at all",
                r#"{"NO_ID_HERE":true}"#,
                r#"[1, 2, 3]"#,
                "",
                r#"{"ISIN_CODE":"INE002B07890"}"#,
            ],
        );
        write_dump(dir.path(), "notes.txt", &["ignored"]);

        let store = DumpStore::load(dir.path()).unwrap();
        assert!(store.collection_exists("isin_basic_info"));
        assert!(!store.collection_exists("notes"));
        assert_eq!(store.skipped_lines("isin_basic_info"), 3);

        let ids = store.distinct_ids("isin_basic_info").unwrap();
        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec!["INE001A01036".to_string(), "INE002B07890".to_string()]
        );

        let doc = store
            .find_one("isin_basic_info", "INE001A01036")
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.get("SECURITY_TYPE").and_then(|v| v.as_str()),
            Some("Debenture")
        );
    }

    #[test]
    fn last_sighting_wins_for_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_dump(
            dir.path(),
            "isin_basic_info.jsonl",
            &[
                r#"{"ISIN_CODE":"INE001A01036","ISIN_STATUS":"Active"}"#,
                r#"{"ISIN_CODE":"INE001A01036","ISIN_STATUS":"Matured"}"#,
            ],
        );
        let store = DumpStore::load(dir.path()).unwrap();
        let doc = store
            .find_one("isin_basic_info", "INE001A01036")
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.get("ISIN_STATUS").and_then(|v| v.as_str()),
            Some("Matured")
        );
    }
}
