//! Migration manager: registration, ordering and the idempotent run loop.

use super::types::{MigrateError, Migration};
use crate::store::SchemaStore;
use crate::tracking::TrackingStore;
use std::sync::Arc;
use tracing::{error, info};

/// Summary of one run: which versions were applied and which were skipped,
/// in execution order. Advisory only; the error path carries the contract.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Orchestrates migration execution against a schema store.
///
/// Holds the registered migrations for the lifetime of one run and a
/// tracking backend chosen at construction. Applied-state is re-queried on
/// every run, never cached across runs.
pub struct MigrationManager {
    store: Arc<dyn SchemaStore>,
    tracker: Box<dyn TrackingStore>,
    migrations: Vec<Migration>,
}

impl MigrationManager {
    /// Create a manager bound to a schema store and a tracking backend.
    pub fn new(store: Arc<dyn SchemaStore>, tracker: Box<dyn TrackingStore>) -> Self {
        Self {
            store,
            tracker,
            migrations: Vec::new(),
        }
    }

    /// Register a migration.
    ///
    /// A migration whose version collides with an already-registered one is
    /// rejected: identical (identity, description) pairs would otherwise run
    /// once but ambiguously, and a truncation collision between distinct
    /// migrations would silently drop one of them.
    pub fn register(&mut self, migration: Migration) -> Result<(), MigrateError> {
        if let Some(existing) = self
            .migrations
            .iter()
            .find(|m| m.version() == migration.version())
        {
            return Err(MigrateError::DuplicateVersion {
                version: existing.version().to_string(),
                description: migration.description().to_string(),
            });
        }

        self.migrations.push(migration);
        Ok(())
    }

    /// Apply all pending migrations exactly once each.
    ///
    /// 1. Query the tracking store for the applied-version set
    /// 2. Stable-sort registrations by version ascending, so execution order
    ///    is deterministic and independent of registration order
    /// 3. Skip applied versions; run each pending body, then record it with
    ///    a fresh timestamp
    ///
    /// The run aborts on the first body or recording failure; migrations
    /// later in the order are not attempted and already-applied ones stay
    /// recorded. A recording failure leaves the mutation real but unmarked,
    /// so the next run re-attempts it (bodies must tolerate that).
    pub async fn run(&mut self) -> Result<RunSummary, MigrateError> {
        let applied = self.tracker.get_applied().await?;

        self.migrations
            .sort_by(|a, b| a.version().cmp(b.version()));

        let mut summary = RunSummary::default();

        for migration in &self.migrations {
            let version = migration.version();

            if applied.contains(version) {
                info!(
                    version,
                    description = migration.description(),
                    "Skipping migration: already applied"
                );
                summary.skipped.push(version.to_string());
                continue;
            }

            info!(
                version,
                description = migration.description(),
                "Applying migration"
            );

            if let Err(e) = migration.apply(Arc::clone(&self.store)).await {
                error!(
                    version,
                    description = migration.description(),
                    error = %e,
                    "Migration failed"
                );
                return Err(MigrateError::Apply {
                    version: version.to_string(),
                    description: migration.description().to_string(),
                    source: e,
                });
            }

            if let Err(e) = self.tracker.record_applied(&migration.record()).await {
                error!(
                    version,
                    description = migration.description(),
                    error = %e,
                    "Migration applied but recording failed"
                );
                return Err(MigrateError::Record {
                    version: version.to_string(),
                    description: migration.description().to_string(),
                    source: e,
                });
            }

            info!(version, "Migration applied successfully");
            summary.applied.push(version.to_string());
        }

        Ok(summary)
    }
}
