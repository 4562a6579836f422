//! In-memory map store.

use super::{MapMetadata, MapStore, validate_target};
use crate::error::{RedirectMapError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
struct StoredMap {
    text: String,
    metadata: MapMetadata,
}

/// Map store backed by a `HashMap`, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryMapStore {
    maps: Mutex<HashMap<String, StoredMap>>,
}

impl MemoryMapStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a target with existing map text.
    #[must_use]
    pub fn with_map(self, target: &str, text: &str) -> Self {
        self.maps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                target.to_string(),
                StoredMap {
                    text: text.to_string(),
                    metadata: MapMetadata::new(DateTime::<Utc>::default(), "seed"),
                },
            );
        self
    }

    /// Number of stored maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MapStore for MemoryMapStore {
    fn read_existing_text(&self, target: &str) -> Result<Option<String>> {
        validate_target(target)?;
        let maps = self.maps.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(maps.get(target).map(|stored| stored.text.clone()))
    }

    fn write_text(
        &self,
        target: &str,
        text: &str,
        modified_at: DateTime<Utc>,
        modified_by: &str,
    ) -> Result<()> {
        validate_target(target)?;
        let mut maps = self
            .maps
            .lock()
            .map_err(|_| RedirectMapError::persistence(target, "store lock poisoned"))?;
        maps.insert(
            target.to_string(),
            StoredMap {
                text: text.to_string(),
                metadata: MapMetadata::new(modified_at, modified_by),
            },
        );
        Ok(())
    }

    fn read_metadata(&self, target: &str) -> Result<Option<MapMetadata>> {
        validate_target(target)?;
        let maps = self.maps.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(maps.get(target).map(|stored| stored.metadata.clone()))
    }
}
