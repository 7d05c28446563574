//! Stoneage-Store: saved calculator entries
//!
//! Persistence for named snapshots of the rebirth calculator form. The core
//! crate only computes; this crate decides where snapshots live.
//!
//! ## Key Components
//!
//! - `EntryStore`: create / list / load / delete contract
//! - `JsonFileStore`: single JSON document with atomic rewrites
//! - `MemoryEntryStore`: in-memory fake for tests

mod error;
pub mod fakes;
mod json_file;
pub mod storage_traits;

pub use error::StorageError;
pub use fakes::MemoryEntryStore;
pub use json_file::{JsonFileStore, FORMAT_VERSION};
pub use storage_traits::{format_timestamp, EntryId, EntryStore, SavedEntry, StorageResult};
