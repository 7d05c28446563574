//! Error taxonomy for the companion core.
//!
//! The calculators themselves never fail: malformed numbers collapse to a
//! default and missing lookups come back as `None`. Only the layers that
//! touch the filesystem (catalog loading, configuration) produce errors.

use std::path::PathBuf;

/// Companion core errors.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("tier index out of range: {0} (expected 0..=4)")]
    TierOutOfRange(usize),

    #[error("unknown stat: {0} (expected con, wis, dex or agi)")]
    UnknownStat(String),
}

/// Result type for companion core operations.
pub type Result<T> = std::result::Result<T, CompanionError>;
