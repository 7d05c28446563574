//! Error types for stoneage-store

use thiserror::Error;

/// Errors from saved-entry storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No entry with this id
    #[error("Saved entry not found: {id}")]
    EntryNotFound { id: String },

    /// Titles must contain something besides whitespace
    #[error("Entry title must not be empty")]
    EmptyTitle,

    /// Store document could not be read or written
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Store document is not valid JSON of the expected shape
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store document was written by a newer format
    #[error("Unsupported store format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
