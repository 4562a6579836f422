//! Persistence for redirect maps.
//!
//! The reconciliation core never touches storage. Orchestration reads the
//! current map text through [`MapStore`] and hands the rendered result back
//! along with modification metadata.

mod filesystem;
mod memory;

pub use filesystem::FsMapStore;
pub use memory::MemoryMapStore;

use crate::error::{RedirectMapError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default file name of a persisted redirect map.
pub const DEFAULT_MAP_FILE_NAME: &str = "redirectmap.txt";

/// MIME type recorded for persisted maps.
pub const MAP_MIME_TYPE: &str = "text/plain";

/// Modification metadata stored next to a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapMetadata {
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
    pub mime_type: String,
}

impl MapMetadata {
    #[must_use]
    pub fn new(modified_at: DateTime<Utc>, modified_by: &str) -> Self {
        Self {
            modified_at,
            modified_by: modified_by.to_string(),
            mime_type: MAP_MIME_TYPE.to_string(),
        }
    }
}

/// Read/write access to persisted redirect maps, keyed by target.
pub trait MapStore {
    /// Current map text for `target`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the map cannot be read.
    fn read_existing_text(&self, target: &str) -> Result<Option<String>>;

    /// Replace the map text for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the write fails.
    fn write_text(
        &self,
        target: &str,
        text: &str,
        modified_at: DateTime<Utc>,
        modified_by: &str,
    ) -> Result<()>;

    /// Metadata of the last write, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata exists but cannot be read.
    fn read_metadata(&self, target: &str) -> Result<Option<MapMetadata>>;
}

/// Validate a target identifier.
///
/// Targets are relative, `/`-separated names. Empty targets, absolute
/// paths and `..` segments are rejected.
///
/// # Errors
///
/// Returns `PathTraversal` if the target is not acceptable.
pub fn validate_target(target: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(RedirectMapError::PathTraversal {
            target: target.to_string(),
            reason: reason.to_string(),
        })
    };

    let trimmed = target.trim();
    if trimmed.is_empty() {
        return reject("target cannot be empty");
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') || trimmed.contains(':') {
        return reject("target must be relative");
    }
    if trimmed.split(['/', '\\']).any(|segment| segment == "..") {
        return reject("target must not contain '..'");
    }
    Ok(())
}
