//! Error types for document access.

use thiserror::Error;

/// The unified error type for the `docstore` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A generic I/O error while reading a dump directory.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A dump line that could not be parsed as a JSON object.
    #[error("malformed document in {collection} at line {line}")]
    MalformedDocument {
        /// Collection (file stem) the line came from.
        collection: String,
        /// 1-based line number within the dump file.
        line: usize,
    },

    /// A dump file whose top-level values are not JSON objects.
    #[error("dump file {0} does not contain JSON objects")]
    NotAnObject(String),
}
