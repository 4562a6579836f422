//! Merge of persisted and uploaded entries.
//!
//! Incoming entries always win: any existing entry whose source matches an
//! incoming source (case-insensitively) is invalidated. Collisions inside
//! the incoming batch are left alone, so an upload that repeats a source
//! keeps both lines.

use crate::model::Entry;
use std::collections::{HashMap, HashSet};

/// Invalidate every existing entry superseded by an incoming source.
///
/// The incoming entry's own validity does not matter. Returns the number of
/// entries that were flipped from valid to invalid.
pub fn invalidate_collisions(existing: &mut [Entry], incoming: &[Entry]) -> usize {
    let incoming_keys: HashSet<String> = incoming.iter().map(Entry::key).collect();

    let mut superseded = 0;
    for entry in existing.iter_mut() {
        if incoming_keys.contains(&entry.key()) {
            if entry.valid {
                superseded += 1;
            }
            entry.invalidate(None);
            tracing::trace!(id = entry.id, source = %entry.source, "Superseded by upload");
        }
    }
    superseded
}

/// Combine existing and incoming entries.
///
/// The result is `existing` (with collisions invalidated) followed by
/// `incoming`, each in its original order. Nothing is added or removed.
#[must_use]
pub fn merge_entries(mut existing: Vec<Entry>, incoming: Vec<Entry>) -> Vec<Entry> {
    let superseded = invalidate_collisions(&mut existing, &incoming);
    tracing::debug!(
        existing = existing.len(),
        incoming = incoming.len(),
        superseded,
        "Merged redirect entries"
    );

    existing.extend(incoming);
    existing
}

/// Groups of entry ids that share a source within one list.
///
/// Only groups with more than one member are returned, ordered by first
/// appearance. Merge keeps all of them valid; this is for reporting.
#[must_use]
pub fn duplicate_sources(entries: &[Entry]) -> Vec<Vec<u64>> {
    let mut groups: Vec<Vec<u64>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let slot = *index.entry(entry.key()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(entry.id);
    }

    groups.retain(|ids| ids.len() > 1);
    groups
}
