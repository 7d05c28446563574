//! In-memory fake for the storage trait (testing only)
//!
//! `MemoryEntryStore` satisfies the `EntryStore` contract without touching
//! the filesystem.

use std::sync::{Mutex, MutexGuard, PoisonError};

use stoneage_core::rebirth::RebirthInputs;

use crate::error::StorageError;
use crate::storage_traits::*;

/// In-memory entry store backed by a `Vec` in insertion order.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<Vec<SavedEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<SavedEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryStore for MemoryEntryStore {
    fn create(&self, title: &str, inputs: &RebirthInputs) -> StorageResult<SavedEntry> {
        let entry = SavedEntry::new(title, inputs)?;
        self.entries().push(entry.clone());
        Ok(entry)
    }

    fn list(&self) -> StorageResult<Vec<SavedEntry>> {
        Ok(newest_first(&self.entries()))
    }

    fn load(&self, id: &EntryId) -> StorageResult<SavedEntry> {
        self.entries()
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| StorageError::EntryNotFound { id: id.0.clone() })
    }

    fn delete(&self, id: &EntryId) -> StorageResult<()> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() == before {
            return Err(StorageError::EntryNotFound { id: id.0.clone() });
        }
        Ok(())
    }
}
