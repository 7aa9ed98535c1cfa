//! The schema-store collaborator interface.
//!
//! The store whose schema is being migrated is opaque to the run loop: the
//! manager and the index-backed tracker only ever talk to it through the
//! narrow [`SchemaStore`] capability set, and migration bodies receive the
//! same handle. Anything that can check/create named indices and read/write
//! documents with immediate visibility can back a migration run.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error types for schema-store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot reach schema store: {0}")]
    Connection(String),

    #[error("schema store rejected request: {0}")]
    Request(String),

    #[error("index {0} already exists")]
    IndexAlreadyExists(String),

    #[error("unexpected response from schema store: {0}")]
    Response(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

/// Capability set the migration core needs from the remote schema store.
///
/// Migration bodies consume this handle directly; the core treats them as
/// black boxes. All calls block the run loop (sequential by design, no
/// cancellation or retry layer here).
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Check whether a named index exists.
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Create a named index with the given structural definition
    /// (e.g. `{"mappings": {...}}`).
    async fn create_index(&self, name: &str, body: &Value) -> Result<(), StoreError>;

    /// Insert a document into an index with immediate visibility, so a
    /// subsequent [`search_all`](Self::search_all) in the same run sees it.
    async fn index_document(&self, index: &str, doc: &Value) -> Result<(), StoreError>;

    /// Return the sources of all documents in an index, bounded at `size`.
    /// A missing index yields an empty list rather than an error.
    async fn search_all(&self, index: &str, size: usize) -> Result<Vec<Value>, StoreError>;
}
