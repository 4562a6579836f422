//! Redirect map reconciliation.
//!
//! Parses persisted and uploaded map text, merges the two entry lists with
//! uploaded entries taking precedence, and renders the surviving lines.
//! Everything here is pure: no I/O, no shared state.

pub mod merge;
pub mod parse;
pub mod serialize;

pub use merge::{duplicate_sources, invalidate_collisions, merge_entries};
pub use parse::{EXTRA_WHITESPACE_MSG, NO_TARGET_MSG, parse_entries, parse_line};
pub use serialize::{render, valid_lines};

use crate::model::Entry;
use serde::Serialize;

/// Merged entries from one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub existing_count: usize,
    pub incoming_count: usize,
    /// Existing entries that were valid before merge and lost to an upload.
    pub superseded_count: usize,
    pub entries: Vec<Entry>,
}

impl Reconciliation {
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries parsed from the stored map, after merge.
    #[must_use]
    pub fn existing(&self) -> &[Entry] {
        &self.entries[..self.existing_count]
    }

    /// Entries parsed from the uploaded map.
    #[must_use]
    pub fn incoming(&self) -> &[Entry] {
        &self.entries[self.existing_count..]
    }

    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Entries that will not be persisted.
    pub fn invalid(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.valid)
    }

    /// Entries carrying a parse diagnostic.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.status.is_empty())
    }

    #[must_use]
    pub fn render(&self) -> String {
        render(&self.entries)
    }
}

/// Reconcile persisted map text with an uploaded map.
///
/// `None` for `existing_text` means nothing has been persisted yet.
#[must_use]
pub fn reconcile(existing_text: Option<&str>, incoming_text: &str) -> Reconciliation {
    let existing = existing_text.map_or_else(Vec::new, |text| parse_entries(text, 0));
    let incoming = parse_entries(incoming_text, 0);

    let existing_count = existing.len();
    let incoming_count = incoming.len();
    let valid_before = existing.iter().filter(|e| e.valid).count();

    let entries = merge_entries(existing, incoming);
    let valid_after = entries[..existing_count].iter().filter(|e| e.valid).count();

    Reconciliation {
        existing_count,
        incoming_count,
        superseded_count: valid_before - valid_after,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_upload_replaces_existing_source() {
        let result = reconcile(Some("/old /new-old"), "/old /new-updated\n/fresh /target");
        assert_eq!(result.entries().len(), 3);
        assert_eq!(result.superseded_count, 1);

        let old = &result.entries()[0];
        assert_eq!(old.target, "/new-old");
        assert!(!old.valid);

        let lines: BTreeSet<String> = valid_lines(result.entries()).into_iter().collect();
        let expected: BTreeSet<String> = ["/old /new-updated", "/fresh /target"]
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_no_existing_map() {
        let result = reconcile(None, "# comment\n\n/a /b");
        assert_eq!(result.render(), "/a /b");
        assert_eq!(result.existing_count, 0);
        assert_eq!(result.incoming_count, 1);
    }

    #[test]
    fn test_case_insensitive_replacement() {
        let result = reconcile(Some("/Path /x"), "/path /y");
        assert_eq!(result.render(), "/path /y");
        assert_eq!(result.invalid().count(), 1);
    }

    #[test]
    fn test_diagnostics_are_kept() {
        let result = reconcile(Some("/keep /x"), "/a /b /c\n/d");
        assert_eq!(result.render(), "/keep /x");
        let statuses: Vec<&str> = result.diagnostics().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].contains("Extra whitespace"));
        assert!(statuses[1].contains("No target found"));
    }

    #[test]
    fn test_reconcile_matches_merge_entries() {
        let existing = "/a /1\n/B\n/c /3 /x\n/d /4";
        let upload = "/b /2\n/C /30\n/e";

        let result = reconcile(Some(existing), upload);
        let merged = merge_entries(parse_entries(existing, 0), parse_entries(upload, 0));
        assert_eq!(result.entries(), merged.as_slice());
        // /B and /c were already invalid, so nothing valid was replaced
        assert_eq!(result.superseded_count, 0);
        assert_eq!(result.existing().len(), 4);
        assert_eq!(result.incoming().len(), 3);
    }

    #[test]
    fn test_reupload_is_stable() {
        let existing = "/a /1\n/b /2\n/c /3";
        let upload = "/B /20\n/d /4";

        let first = reconcile(Some(existing), upload).render();
        let second = reconcile(Some(first.as_str()), upload).render();

        let first_set: BTreeSet<&str> = first.lines().collect();
        let second_set: BTreeSet<&str> = second.lines().collect();
        assert_eq!(first_set, second_set);
    }
}
