//! Line parser for redirect map files.
//!
//! # Line Grammar
//!
//! - Lines end with `\n`, `\r\n` or a lone `\r`
//! - One rule per line: `<source> <target>`, separated by any run of
//!   ASCII whitespace (space, tab, vertical tab, form feed, CR, LF)
//! - Blank lines and lines whose first non-whitespace character is `#`
//!   are skipped and produce no entry
//! - A line with more than two tokens keeps the first two and is marked
//!   invalid
//! - A line with a single token gets an empty target and is marked invalid

use crate::model::{Entry, Origin};

/// Status template for lines with more than two tokens.
pub const EXTRA_WHITESPACE_MSG: &str = "Extra whitespace found in entry";
/// Status template for lines without a target.
pub const NO_TARGET_MSG: &str = "No target found in entry";

/// Token separators. Unicode spaces such as NBSP are part of a token.
const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Parse a single line into an entry.
///
/// Returns `None` for blank and comment lines.
#[must_use]
pub fn parse_line(id: u64, line: &str) -> Option<Entry> {
    let logical = line.trim_matches(is_separator);
    if logical.is_empty() || logical.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = logical
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .collect();
    let entry = match tokens.as_slice() {
        [source, target] => Entry::new(id, *source, *target, Origin::File),
        [source, target, ..] => Entry::invalid(
            id,
            *source,
            *target,
            Origin::File,
            format!("{EXTRA_WHITESPACE_MSG} {line}"),
        ),
        [source] => Entry::invalid(
            id,
            *source,
            "",
            Origin::File,
            format!("{NO_TARGET_MSG} {line}"),
        ),
        [] => return None,
    };

    Some(entry)
}

/// Parse map text into entries.
///
/// Ids are `start_id` plus the zero-based line index, so skipped lines
/// leave gaps but produced ids stay strictly increasing.
#[must_use]
pub fn parse_entries(text: &str, start_id: u64) -> Vec<Entry> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .lines()
        .zip(start_id..)
        .filter_map(|(line, id)| parse_line(id, line))
        .collect()
}
