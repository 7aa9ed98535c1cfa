//! Types for the migration run loop.

use crate::store::{SchemaStore, StoreError};
use crate::tracking::TrackingError;
use crate::version::compute_version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Error types for migration runs.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("duplicate migration version {version} ({description})")]
    DuplicateVersion { version: String, description: String },

    #[error("tracking store error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("migration {version} ({description}) failed: {source}")]
    Apply {
        version: String,
        description: String,
        #[source]
        source: StoreError,
    },

    #[error("migration {version} ({description}) applied but could not be recorded: {source}")]
    Record {
        version: String,
        description: String,
        #[source]
        source: TrackingError,
    },
}

/// Boxed future returned by a migration body.
pub type MigrationFuture = Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send>>;

/// A migration body: an idempotent schema mutation run against the store
/// handle. Bodies must tolerate re-invocation (e.g. "create index if absent")
/// since a recording failure leaves the mutation applied but unmarked.
pub type MigrationFn = Box<dyn Fn(Arc<dyn SchemaStore>) -> MigrationFuture + Send + Sync>;

/// One named, versioned, idempotent schema-mutation unit.
///
/// Immutable once constructed. The version is content-addressed: derived from
/// the caller-supplied stable identity and the description, so changing
/// either produces a new version while unchanged inputs reproduce the same
/// token everywhere.
pub struct Migration {
    identity: String,
    description: String,
    body: MigrationFn,
    version: String,
}

impl Migration {
    /// Create a migration.
    ///
    /// `identity` is an explicit stable identifier distinguishing this
    /// migration's code from any other (callers typically use the body
    /// function's name); it is part of the version, so renaming it changes
    /// the version.
    pub fn new<F, Fut>(identity: impl Into<String>, description: impl Into<String>, body: F) -> Self
    where
        F: Fn(Arc<dyn SchemaStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        let identity = identity.into();
        let description = description.into();
        let version = compute_version(&identity, &description);

        Self {
            identity,
            description,
            body: Box::new(move |store| -> MigrationFuture { Box::pin(body(store)) }),
            version,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The 8-hex-character content-derived version token.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Run the migration body against the store handle.
    pub(crate) async fn apply(&self, store: Arc<dyn SchemaStore>) -> Result<(), StoreError> {
        (self.body)(store).await
    }

    /// Build the persisted record for this migration, stamped now.
    pub(crate) fn record(&self) -> MigrationRecord {
        MigrationRecord {
            version: self.version.clone(),
            description: self.description.clone(),
            applied_at: Utc::now(),
            identity: self.identity.clone(),
        }
    }
}

/// Persisted fact: version V was applied at time T.
///
/// Created once per successful application; never mutated and never deleted
/// by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRecord {
    pub version: String,
    pub description: String,
    pub applied_at: DateTime<Utc>,
    pub identity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_store: Arc<dyn SchemaStore>) -> MigrationFuture {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn test_version_derived_at_construction() {
        let migration = Migration::new("create_users_index", "Create users index", noop);
        assert_eq!(migration.version().len(), 8);
        assert_eq!(
            migration.version(),
            compute_version("create_users_index", "Create users index")
        );
    }

    #[test]
    fn test_same_inputs_same_version_across_instances() {
        let a = Migration::new("m1", "Add field", noop);
        let b = Migration::new("m1", "Add field", noop);
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn test_record_carries_migration_fields() {
        let migration = Migration::new("m1", "Add field", noop);
        let record = migration.record();
        assert_eq!(record.version, migration.version());
        assert_eq!(record.description, "Add field");
        assert_eq!(record.identity, "m1");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let migration = Migration::new("m1", "Add field", noop);
        let json = serde_json::to_value(migration.record()).unwrap();
        assert!(json.get("appliedAt").is_some());
        assert!(json.get("applied_at").is_none());
    }
}
