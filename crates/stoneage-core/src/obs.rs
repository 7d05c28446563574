//! Structured log events for the companion's lifecycle.
//!
//! Every event carries an `event` field so log pipelines can filter on it:
//! `catalog.loaded`, `rebirth.computed`, `entry.saved`, `entry.loaded`,
//! `entry.deleted` and `pet.lookup_miss`.
//!
//! Verbosity follows `RUST_LOG`; JSON output is selected in [`crate::init_tracing`].

use tracing::{info, warn};

use crate::rebirth::TierResult;

/// RAII guard that tags everything logged inside it with a saved-entry id.
///
/// ```ignore
/// let _span = EntrySpan::enter("1f0e...");
/// // every event below carries entry_id = "1f0e..."
/// ```
pub struct EntrySpan {
    _span: tracing::span::EnteredSpan,
}

impl EntrySpan {
    pub fn enter(entry_id: &str) -> Self {
        let span = tracing::info_span!("stoneage.entry", entry_id = %entry_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: reference datasets loaded.
pub fn emit_catalog_loaded(data_dir: &str, pets: usize, characters: usize) {
    info!(
        event = "catalog.loaded",
        data_dir = %data_dir,
        pets = pets,
        characters = characters,
    );
}

/// Emit event: the five tiers were evaluated.
pub fn emit_rebirth_computed(results: &[TierResult]) {
    let last = results.last().map(|r| r.final_rebirth_value).unwrap_or(0);
    let maxed = results.iter().filter(|r| r.is_max()).count();
    info!(
        event = "rebirth.computed",
        tiers = results.len(),
        final_value = last,
        maxed_tiers = maxed,
    );
}

/// Emit event: a calculator state was saved.
pub fn emit_entry_saved(entry_id: &str, title: &str) {
    info!(event = "entry.saved", entry_id = %entry_id, title = %title);
}

/// Emit event: a saved calculator state was loaded.
pub fn emit_entry_loaded(entry_id: &str, title: &str) {
    info!(event = "entry.loaded", entry_id = %entry_id, title = %title);
}

/// Emit event: a saved calculator state was deleted.
pub fn emit_entry_deleted(entry_id: &str) {
    info!(event = "entry.deleted", entry_id = %entry_id);
}

/// Emit event: a boarding entry has no pet record (warning level).
pub fn emit_pet_lookup_miss(name: &str) {
    warn!(event = "pet.lookup_miss", name = %name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebirth::RebirthInputs;

    #[test]
    fn emitters_do_not_panic_without_subscriber() {
        emit_catalog_loaded("data", 3, 2);
        emit_rebirth_computed(&RebirthInputs::default().compute());
        emit_rebirth_computed(&[]);
        emit_entry_saved("id-1", "title");
        emit_entry_loaded("id-1", "title");
        emit_entry_deleted("id-1");
        emit_pet_lookup_miss("없는펫");
    }

    #[test]
    fn entry_span_create() {
        let _span = EntrySpan::enter("test-entry-id");
    }
}
