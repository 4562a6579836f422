//! Rendering of merged entries back to map text.

use crate::model::Entry;

/// Map lines for every valid entry, in list order.
#[must_use]
pub fn valid_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.valid)
        .map(Entry::as_line)
        .collect()
}

/// Render valid entries as newline-separated text without a trailing newline.
#[must_use]
pub fn render(entries: &[Entry]) -> String {
    valid_lines(entries).join("\n")
}
