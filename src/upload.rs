//! Upload orchestration.
//!
//! Read the persisted map, reconcile it with the uploaded text, and write
//! the surviving lines back with modification metadata. Concurrent uploads
//! to the same target are last-writer-wins; callers that need more must
//! serialize them.

use crate::error::Result;
use crate::model::Entry;
use crate::redirect::{Reconciliation, reconcile};
use crate::store::MapStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub target: String,
    pub existing_count: usize,
    pub incoming_count: usize,
    pub superseded_count: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
    /// Merged entries, including invalid ones.
    pub entries: Vec<Entry>,
    /// Text that was persisted.
    #[serde(skip)]
    pub written: String,
}

impl UploadOutcome {
    fn from_reconciliation(
        target: &str,
        result: Reconciliation,
        modified_at: DateTime<Utc>,
        modified_by: &str,
    ) -> Self {
        let written = result.render();
        let valid_count = result.valid_count();
        let invalid_count = result.entries.len() - valid_count;
        Self {
            target: target.to_string(),
            existing_count: result.existing_count,
            incoming_count: result.incoming_count,
            superseded_count: result.superseded_count,
            valid_count,
            invalid_count,
            modified_at,
            modified_by: modified_by.to_string(),
            entries: result.entries,
            written,
        }
    }

    /// Entries rejected at parse time, with their diagnostics.
    pub fn rejected(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.status.is_empty())
    }

    /// Rejected entries that came from the stored map.
    pub fn rejected_existing(&self) -> impl Iterator<Item = &Entry> {
        self.entries[..self.existing_count]
            .iter()
            .filter(|e| !e.status.is_empty())
    }

    /// Rejected entries that came from the uploaded text.
    pub fn rejected_uploaded(&self) -> impl Iterator<Item = &Entry> {
        self.entries[self.existing_count..]
            .iter()
            .filter(|e| !e.status.is_empty())
    }
}

/// Merge `incoming_text` into the map stored at `target` and persist it.
///
/// # Errors
///
/// Returns an error if the existing map cannot be read or the merged map
/// cannot be written. Malformed lines are not errors.
pub fn upload_redirect_map<S: MapStore + ?Sized>(
    store: &S,
    target: &str,
    incoming_text: &str,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<UploadOutcome> {
    let existing_text = store.read_existing_text(target)?;
    let result = reconcile(existing_text.as_deref(), incoming_text);
    let outcome = UploadOutcome::from_reconciliation(target, result, now, actor);

    tracing::info!(
        target_map = target,
        valid = outcome.valid_count,
        invalid = outcome.invalid_count,
        "Updating redirect map"
    );
    store.write_text(target, &outcome.written, now, actor)?;
    tracing::debug!(target_map = target, "Changes saved");

    Ok(outcome)
}
