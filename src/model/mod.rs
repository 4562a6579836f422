//! Core data types for `redirect_maps`.
//!
//! - `Entry` - One redirect rule candidate parsed from a map file
//! - `Origin` - Where an entry came from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Parsed from an uploaded or persisted map file.
    #[default]
    File,
    /// Added by hand through an editor. Not produced by the parser.
    Manual,
}

impl Origin {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Origin {
    type Err = crate::error::RedirectMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "manual" => Ok(Self::Manual),
            other => Err(crate::error::RedirectMapError::validation(
                "origin",
                format!("unknown origin '{other}'"),
            )),
        }
    }
}

/// One redirect rule candidate.
///
/// Only `valid` and `status` change after parsing, and only from valid to
/// invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Parse-order id, unique within the list that produced it.
    pub id: u64,
    /// Path or pattern being redirected.
    pub source: String,
    /// Redirect destination. Empty when the line had no target.
    pub target: String,
    pub origin: Origin,
    pub valid: bool,
    /// Diagnostic text. Empty for clean entries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

impl Entry {
    /// Create a valid entry.
    #[must_use]
    pub fn new(
        id: u64,
        source: impl Into<String>,
        target: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            target: target.into(),
            origin,
            valid: true,
            status: String::new(),
        }
    }

    /// Create an entry that failed validation at parse time.
    #[must_use]
    pub fn invalid(
        id: u64,
        source: impl Into<String>,
        target: impl Into<String>,
        origin: Origin,
        status: impl Into<String>,
    ) -> Self {
        Self {
            valid: false,
            status: status.into(),
            ..Self::new(id, source, target, origin)
        }
    }

    /// Case-insensitive deduplication key.
    #[must_use]
    pub fn key(&self) -> String {
        source_key(&self.source)
    }

    /// Mark this entry invalid. An existing status is kept unless a new one
    /// is given.
    pub fn invalidate(&mut self, status: Option<String>) {
        self.valid = false;
        if let Some(status) = status {
            self.status = status;
        }
    }

    /// Render as a map line (`<source> <target>`).
    #[must_use]
    pub fn as_line(&self) -> String {
        format!("{} {}", self.source, self.target)
    }
}

/// Normalize a source for case-insensitive comparison.
///
/// Folds one character at a time (upper-case, then lower-case), so two
/// sources match only if they have the same length and each pair of
/// characters is equal under either mapping. Multi-character expansions
/// such as `ß` -> `SS` do not apply.
#[must_use]
pub fn source_key(source: &str) -> String {
    source.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    let upper = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    // `İ` lower-cases to `i` plus a combining dot; keep the base letter.
    upper.to_lowercase().next().unwrap_or(upper)
}
