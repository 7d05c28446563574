//! JSON-file backend for saved entries.
//!
//! The whole store is a single document `{"version": N, "entries": [...]}`.
//! Every mutation re-reads the file, applies the change and rewrites it
//! through a temp file in the same directory that is then renamed over the
//! original, so readers never observe a half-written store. A missing file
//! reads as an empty store; a document with a newer `version` is rejected.
//!
//! ```
//! use stoneage_core::rebirth::RebirthInputs;
//! use stoneage_store::{EntryStore, JsonFileStore};
//!
//! let dir = tempfile::tempdir()?;
//! let store = JsonFileStore::open(dir.path().join("entries.json"))?;
//! let saved = store.create("max build", &RebirthInputs::default())?;
//!
//! let reopened = JsonFileStore::open(dir.path().join("entries.json"))?;
//! assert_eq!(reopened.load(&saved.id)?.title, "max build");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use stoneage_core::rebirth::RebirthInputs;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;
use crate::storage_traits::*;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    entries: Vec<SavedEntry>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }
}

/// Saved entries in a single JSON document.
///
/// Every mutation rewrites the document atomically (temp file in the same
/// directory, then rename). A missing file is an empty store.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`. Creates the parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<StoreDocument> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default())
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        let doc: StoreDocument = serde_json::from_slice(&bytes)?;
        if doc.version > FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: doc.version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(doc)
    }

    fn write_document(&self, doc: &StoreDocument) -> StorageResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let json = serde_json::to_vec_pretty(doc)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), entries = doc.entries.len(), "store written");
        Ok(())
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreDocument) -> StorageResult<T>) -> StorageResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut doc = self.read_document()?;
        let out = f(&mut doc)?;
        doc.version = FORMAT_VERSION;
        self.write_document(&doc)?;
        Ok(out)
    }
}

impl EntryStore for JsonFileStore {
    fn create(&self, title: &str, inputs: &RebirthInputs) -> StorageResult<SavedEntry> {
        let entry = SavedEntry::new(title, inputs)?;
        self.mutate(|doc| {
            doc.entries.push(entry.clone());
            Ok(())
        })?;
        Ok(entry)
    }

    fn list(&self) -> StorageResult<Vec<SavedEntry>> {
        Ok(newest_first(&self.read_document()?.entries))
    }

    fn load(&self, id: &EntryId) -> StorageResult<SavedEntry> {
        self.read_document()?
            .entries
            .into_iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| StorageError::EntryNotFound { id: id.0.clone() })
    }

    fn delete(&self, id: &EntryId) -> StorageResult<()> {
        self.mutate(|doc| {
            let before = doc.entries.len();
            doc.entries.retain(|e| &e.id != id);
            if doc.entries.len() == before {
                return Err(StorageError::EntryNotFound { id: id.0.clone() });
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("saved.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty() {
        let (_dir, store) = make_store();
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("saved.json");
        let store = JsonFileStore::open(&nested).unwrap();
        store.create("x", &RebirthInputs::default()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn survives_reopen() {
        let (dir, store) = make_store();
        let entry = store.create("keep me", &RebirthInputs::default()).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(dir.path().join("saved.json")).unwrap();
        assert_eq!(reopened.load(&entry.id).unwrap(), entry);
    }

    #[test]
    fn document_has_version() {
        let (_dir, store) = make_store();
        store.create("v", &RebirthInputs::default()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], FORMAT_VERSION);
        assert_eq!(raw["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn newer_version_is_rejected() {
        let (_dir, store) = make_store();
        std::fs::write(store.path(), r#"{"version": 99, "entries": []}"#).unwrap();
        match store.list() {
            Err(StorageError::UnsupportedVersion { found, .. }) => assert_eq!(found, 99),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_document_is_serialization_error() {
        let (_dir, store) = make_store();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.list(), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn failed_delete_leaves_file_untouched() {
        let (_dir, store) = make_store();
        store.create("one", &RebirthInputs::default()).unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store.delete(&EntryId::from("missing")).unwrap_err();
        assert!(matches!(err, StorageError::EntryNotFound { .. }));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }
}
