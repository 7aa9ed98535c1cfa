//! Remote-index-backed tracking store.

use super::{TrackingError, TrackingStore};
use crate::migration::MigrationRecord;
use crate::store::{SchemaStore, StoreError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reserved index holding one record per applied migration.
pub const MIGRATIONS_INDEX: &str = ".esmigrate_migrations";

/// Upper bound on the applied-version scan. Far beyond any realistic
/// migration count.
const SCAN_SIZE: usize = 1000;

/// Tracks applied migrations in a reserved index inside the schema store.
pub struct IndexTracker {
    store: Arc<dyn SchemaStore>,
}

impl IndexTracker {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Ensure the reserved index exists with its fixed mapping.
    ///
    /// Check-then-create; a concurrent creation surfacing as "already exists"
    /// is tolerated, any other failure aborts before migrations run.
    async fn ensure_index(&self) -> Result<(), TrackingError> {
        let exists = self
            .store
            .index_exists(MIGRATIONS_INDEX)
            .await
            .map_err(TrackingError::Store)?;

        if exists {
            return Ok(());
        }

        debug!(index = MIGRATIONS_INDEX, "creating migrations tracking index");

        let mapping = json!({
            "mappings": {
                "properties": {
                    "version":     { "type": "keyword" },
                    "description": { "type": "text" },
                    "appliedAt":   { "type": "date" },
                    "identity":    { "type": "keyword" }
                }
            }
        });

        match self.store.create_index(MIGRATIONS_INDEX, &mapping).await {
            Ok(()) => Ok(()),
            Err(StoreError::IndexAlreadyExists(_)) => Ok(()),
            Err(StoreError::Connection(e)) => Err(TrackingError::Store(StoreError::Connection(e))),
            Err(e) => Err(TrackingError::Init(e.to_string())),
        }
    }
}

#[async_trait]
impl TrackingStore for IndexTracker {
    async fn get_applied(&self) -> Result<HashSet<String>, TrackingError> {
        self.ensure_index().await?;

        let docs = self
            .store
            .search_all(MIGRATIONS_INDEX, SCAN_SIZE)
            .await
            .map_err(TrackingError::Store)?;

        let mut applied = HashSet::new();
        for doc in docs {
            if let Some(version) = doc.get("version").and_then(|v| v.as_str()) {
                applied.insert(version.to_string());
            }
        }

        Ok(applied)
    }

    async fn record_applied(&self, record: &MigrationRecord) -> Result<(), TrackingError> {
        let doc = serde_json::to_value(record)?;
        self.store
            .index_document(MIGRATIONS_INDEX, &doc)
            .await
            .map_err(TrackingError::Store)?;
        Ok(())
    }
}
