//! Migration run loop for schema stores.
//!
//! # Overview
//!
//! - Callers construct [`Migration`]s wrapping idempotent schema mutations
//! - Each migration's version is content-derived from its identity and
//!   description, so the same code yields the same version everywhere
//! - The [`MigrationManager`] queries a [`TrackingStore`](crate::tracking::TrackingStore)
//!   for already-applied versions, sorts pending migrations by version and
//!   applies each exactly once, recording success as it goes
//! - Any failure stops the run; re-running is always safe because applied
//!   versions are skipped
//!
//! # Usage
//!
//! ```ignore
//! let store = Arc::new(EsClient::new("http://localhost:9200")?);
//! let tracker = Box::new(IndexTracker::new(Arc::clone(&store) as Arc<dyn SchemaStore>));
//! let mut manager = MigrationManager::new(store, tracker);
//! manager.register(Migration::new("create_users_index", "Create users index", body))?;
//! manager.run().await?;
//! ```

mod manager;
mod types;

pub use manager::{MigrationManager, RunSummary};
pub use types::{MigrateError, Migration, MigrationFn, MigrationFuture, MigrationRecord};
