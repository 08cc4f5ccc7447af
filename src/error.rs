//! Error taxonomy for build and persistence operations.
//!
//! "No match" is never an error: [`find`](crate::TrieIndex::find) always
//! returns a (possibly empty) ID sequence. Nothing here is retried
//! internally; every failure is surfaced to the immediate caller.

use thiserror::Error;

/// Errors surfaced by index construction and persistence.
#[derive(Debug, Error)]
pub enum Error {
    /// The phrase source failed mid-read, for any reason other than
    /// reaching its natural end. The build does not complete and no
    /// partially built index is returned.
    #[error("failed to read phrase source: {0}")]
    Ingest(#[source] std::io::Error),

    /// The persistence source or destination could not be opened, read,
    /// or written.
    #[error("index i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The index exceeds a limit of the binary format and cannot be
    /// serialized. Raised before any bytes are produced; a successful
    /// [`to_bytes`](crate::TrieIndex::to_bytes) always decodes.
    #[error("index not serializable: {0}")]
    Encode(String),

    /// Persisted index data is truncated or malformed. Distinct from
    /// [`Error::Io`] so callers can tell a corrupt file from a missing one.
    #[error("malformed index data: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
