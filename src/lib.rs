pub mod client;
pub mod migration;
pub mod store;
pub mod tracking;
pub mod version;

// Re-export commonly used types
pub use client::EsClient;
pub use migration::{
    MigrateError, Migration, MigrationManager, MigrationRecord, RunSummary,
};
pub use store::{SchemaStore, StoreError};
pub use tracking::{FileTracker, IndexTracker, TrackingError, TrackingStore, MIGRATIONS_INDEX};
pub use version::compute_version;
