//! Applied-state tracking for migrations.
//!
//! A [`TrackingStore`] answers one question (which versions have already been
//! applied?) and records one fact (this version has now been applied). Two
//! interchangeable backends exist:
//!
//! - [`IndexTracker`] keeps one record per applied migration in a reserved
//!   index inside the schema store itself
//! - [`FileTracker`] keeps a flat version map in a local JSON file
//!
//! The backend is chosen once at construction, never per migration. Neither
//! backend implements locking: at most one runner process per tracking target
//! is assumed.

mod file;
mod index;

pub use file::FileTracker;
pub use index::{IndexTracker, MIGRATIONS_INDEX};

use crate::migration::MigrationRecord;
use crate::store::StoreError;
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

/// Error types for tracking-store operations.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tracking file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema store error: {0}")]
    Store(#[from] StoreError),

    #[error("cannot initialize tracking index: {0}")]
    Init(String),
}

/// Records which migration versions have been applied.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// Return every version previously recorded. An empty or nonexistent
    /// backing store yields an empty set (first-run case), not an error.
    async fn get_applied(&self) -> Result<HashSet<String>, TrackingError>;

    /// Durably persist that `record.version` has been applied. Called only
    /// after the migration body succeeded; repeating the call for the same
    /// version is safe (last write wins).
    async fn record_applied(&self, record: &MigrationRecord) -> Result<(), TrackingError>;
}
