//! Saved-entry model and the storage trait.
//!
//! A saved entry is a named snapshot of the rebirth calculator form (five
//! levels, five allocations). Derived tier results are never stored; they are
//! recomputed from the inputs on load.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use stoneage_core::rebirth::{RebirthInputs, StatInput, TIER_COUNT};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Unique identifier for a saved entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Generate a new random EntryId
    pub fn new() -> Self {
        EntryId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 8 chars) for listings.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

/// A named calculator snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub id: EntryId,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub levels: [u32; TIER_COUNT],
    pub stats: [StatInput; TIER_COUNT],
}

impl SavedEntry {
    /// Build a new entry with a fresh id and the current time.
    ///
    /// The title is trimmed; an empty title is rejected.
    pub fn new(title: &str, inputs: &RebirthInputs) -> StorageResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StorageError::EmptyTitle);
        }
        Ok(Self {
            id: EntryId::new(),
            title: title.to_string(),
            timestamp: Utc::now(),
            levels: inputs.levels,
            stats: inputs.stats,
        })
    }

    /// The calculator form this entry restores.
    pub fn inputs(&self) -> RebirthInputs {
        RebirthInputs {
            levels: self.levels,
            stats: self.stats,
        }
    }
}

/// Render a timestamp in local time as `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Order entries newest first. Equal timestamps keep the later-created entry first.
pub(crate) fn newest_first(entries: &[SavedEntry]) -> Vec<SavedEntry> {
    let mut sorted: Vec<SavedEntry> = entries.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

/// Saved-entry store.
///
/// Guarantees:
/// - `create` returns the stored entry with a fresh unique id.
/// - `list` returns every entry, newest first.
/// - `load` / `delete` of an unknown id fail with `StorageError::EntryNotFound`.
pub trait EntryStore: Send + Sync {
    /// Save the calculator form under `title`.
    fn create(&self, title: &str, inputs: &RebirthInputs) -> StorageResult<SavedEntry>;

    /// All saved entries, newest first.
    fn list(&self) -> StorageResult<Vec<SavedEntry>>;

    /// Retrieve an entry by id.
    fn load(&self, id: &EntryId) -> StorageResult<SavedEntry>;

    /// Remove an entry by id.
    fn delete(&self, id: &EntryId) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_entry_trims_title() {
        let entry = SavedEntry::new("  my build  ", &RebirthInputs::default()).unwrap();
        assert_eq!(entry.title, "my build");
        assert_eq!(entry.inputs(), RebirthInputs::default());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = SavedEntry::new("   ", &RebirthInputs::default()).unwrap_err();
        assert!(matches!(err, StorageError::EmptyTitle));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(EntryId::new(), EntryId::new());
    }

    #[test]
    fn short_id_is_prefix() {
        let id = EntryId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(EntryId::from("abc").short(), "abc");
    }

    #[test]
    fn entry_json_shape() {
        let entry = SavedEntry::new("build", &RebirthInputs::default()).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["id"].is_string());
        assert_eq!(value["levels"].as_array().unwrap().len(), 5);
        assert_eq!(value["stats"][0]["con"], 437);
    }

    #[test]
    fn missing_agi_defaults_to_zero() {
        let json = r#"{
            "id": "x",
            "title": "old",
            "timestamp": "2025-01-01T00:00:00Z",
            "levels": [140, 140, 140, 140, 140],
            "stats": [
                {"con": 437, "wis": 0, "dex": 0},
                {"con": 483, "wis": 0, "dex": 0},
                {"con": 515, "wis": 0, "dex": 0},
                {"con": 547, "wis": 0, "dex": 0},
                {"con": 578, "wis": 0, "dex": 0}
            ]
        }"#;
        let entry: SavedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.stats[4].agi, 0);
        assert_eq!(entry.inputs(), RebirthInputs::default());
    }

    #[test]
    fn format_timestamp_shape() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text.len(), "2025-03-04 05:06".len());
        assert!(text.starts_with("2025-03-0"));
    }
}
