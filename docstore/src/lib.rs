//! Read-side access to the per-ISIN document collections.
//!
//! The migration engine never talks to the document store directly; it only
//! consumes the [`DocumentLookup`] capability. Two implementations ship here:
//! [`dump::DumpStore`] reads mongoexport-style JSONL dump directories for
//! real runs, and [`memory::MemoryStore`] backs tests.

#![deny(missing_docs)]

pub mod document;
pub mod dump;
pub mod errors;
pub mod lookup;
pub mod memory;

pub use document::Document;
pub use dump::DumpStore;
pub use errors::Error;
pub use lookup::DocumentLookup;
pub use memory::MemoryStore;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
