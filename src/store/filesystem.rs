//! Directory-backed map store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<target>/redirectmap.txt            map text
//! <root>/<target>/.redirectmap.meta.json     modification metadata
//! ```

use super::{DEFAULT_MAP_FILE_NAME, MapMetadata, MapStore, validate_target};
use crate::error::{RedirectMapError, Result};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

const METADATA_FILE_NAME: &str = ".redirectmap.meta.json";

/// Map store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsMapStore {
    root: PathBuf,
    map_file_name: String,
}

impl FsMapStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_map_file_name(root, DEFAULT_MAP_FILE_NAME)
    }

    #[must_use]
    pub fn with_map_file_name(root: impl Into<PathBuf>, map_file_name: &str) -> Self {
        Self {
            root: root.into(),
            map_file_name: map_file_name.to_string(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the map for `target`.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` for targets outside the store root.
    pub fn target_dir(&self, target: &str) -> Result<PathBuf> {
        validate_target(target)?;
        Ok(self.root.join(target.trim()))
    }

    /// Path of the map file for `target`.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` for targets outside the store root.
    pub fn map_path(&self, target: &str) -> Result<PathBuf> {
        Ok(self.target_dir(target)?.join(&self.map_file_name))
    }

    fn metadata_path(&self, target: &str) -> Result<PathBuf> {
        Ok(self.target_dir(target)?.join(METADATA_FILE_NAME))
    }
}

impl MapStore for FsMapStore {
    fn read_existing_text(&self, target: &str) -> Result<Option<String>> {
        let path = self.map_path(target)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), bytes = text.len(), "Read existing map");
                Ok(Some(text))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No existing map");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write_text(
        &self,
        target: &str,
        text: &str,
        modified_at: DateTime<Utc>,
        modified_by: &str,
    ) -> Result<()> {
        let dir = self.target_dir(target)?;
        fs::create_dir_all(&dir)
            .map_err(|e| RedirectMapError::persistence(target, format!("create directory: {e}")))?;

        write_atomic(&self.map_path(target)?, text.as_bytes())
            .map_err(|e| RedirectMapError::persistence(target, format!("write map: {e}")))?;

        let metadata = MapMetadata::new(modified_at, modified_by);
        let json = serde_json::to_vec_pretty(&metadata)?;
        write_atomic(&self.metadata_path(target)?, &json)
            .map_err(|e| RedirectMapError::persistence(target, format!("write metadata: {e}")))?;

        tracing::debug!(dir = %dir.display(), modified_by, "Map written");
        Ok(())
    }

    fn read_metadata(&self, target: &str) -> Result<Option<MapMetadata>> {
        let path = self.metadata_path(target)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Write to a sibling temp file, then rename over the destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut writer = BufWriter::new(File::create(&temp_path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_map_reads_none() {
        let temp = TempDir::new().unwrap();
        let store = FsMapStore::new(temp.path());
        assert_eq!(store.read_existing_text("site").unwrap(), None);
        assert_eq!(store.read_metadata("site").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let store = FsMapStore::new(temp.path());
        let now = Utc::now();

        store
            .write_text("site/en", "/a /b\n/c /d", now, "admin")
            .unwrap();

        let text = store.read_existing_text("site/en").unwrap();
        assert_eq!(text.as_deref(), Some("/a /b\n/c /d"));
        assert!(temp.path().join("site/en/redirectmap.txt").is_file());
        assert!(!temp.path().join("site/en/redirectmap.txt.tmp").exists());

        let meta = store.read_metadata("site/en").unwrap().unwrap();
        assert_eq!(meta.modified_at, now);
        assert_eq!(meta.modified_by, "admin");
        assert_eq!(meta.mime_type, "text/plain");
    }

    #[test]
    fn test_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = FsMapStore::new(temp.path());
        store.write_text("t", "/a /b", Utc::now(), "one").unwrap();
        store.write_text("t", "/c /d", Utc::now(), "two").unwrap();
        assert_eq!(
            store.read_existing_text("t").unwrap().as_deref(),
            Some("/c /d")
        );
        assert_eq!(store.read_metadata("t").unwrap().unwrap().modified_by, "two");
    }

    #[test]
    fn test_custom_map_file_name() {
        let temp = TempDir::new().unwrap();
        let store = FsMapStore::with_map_file_name(temp.path(), "rewrites.map");
        store.write_text("t", "/a /b", Utc::now(), "me").unwrap();
        assert!(temp.path().join("t/rewrites.map").is_file());
    }

    #[test]
    fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let store = FsMapStore::new(temp.path().join("store"));
        let err = store
            .write_text("../outside", "/a /b", Utc::now(), "me")
            .unwrap_err();
        assert!(matches!(err, RedirectMapError::PathTraversal { .. }));
        assert!(!temp.path().join("outside").exists());
    }
}
