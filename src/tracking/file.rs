//! Local-file-backed tracking store.

use super::{TrackingError, TrackingStore};
use crate::migration::MigrationRecord;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tokio::fs;

/// Tracks applied migrations in a single JSON file mapping version tokens to
/// a `true` marker.
///
/// A missing file is an empty map, created on first write. The whole map is
/// read, mutated in memory and written back; this is a single-writer
/// resource with no locking, concurrent runners against the same path are
/// unsupported.
pub struct FileTracker {
    path: PathBuf,
}

impl FileTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_versions(&self) -> Result<HashMap<String, bool>, TrackingError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        // `null` deserializes to None; anything else malformed is an error.
        let versions: Option<HashMap<String, bool>> = serde_json::from_str(&content)?;
        Ok(versions.unwrap_or_default())
    }

    /// Overwrite the file with the full map, via temp file + rename so a
    /// reader never observes a partial write.
    async fn write_versions(&self, versions: &HashMap<String, bool>) -> Result<(), TrackingError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(versions)?;
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl TrackingStore for FileTracker {
    async fn get_applied(&self) -> Result<HashSet<String>, TrackingError> {
        let versions = self.read_versions().await?;
        Ok(versions
            .into_iter()
            .filter(|(_, applied)| *applied)
            .map(|(version, _)| version)
            .collect())
    }

    async fn record_applied(&self, record: &MigrationRecord) -> Result<(), TrackingError> {
        let mut versions = self.read_versions().await?;
        versions.insert(record.version.clone(), true);
        self.write_versions(&versions).await
    }
}
