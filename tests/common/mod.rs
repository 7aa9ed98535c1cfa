//! Shared helpers for integration tests.

use async_trait::async_trait;
use esmigrate::{Migration, SchemaStore, StoreError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the remote schema store: named indices holding a
/// structural definition and a list of documents. Inserts are immediately
/// visible, matching the refresh guarantee the real client provides.
#[derive(Default)]
pub struct InMemoryStore {
    indices: Mutex<HashMap<String, StoredIndex>>,
}

struct StoredIndex {
    #[allow(dead_code)]
    definition: Value,
    docs: Vec<Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indices.lock().unwrap().contains_key(name)
    }

    pub fn doc_count(&self, index: &str) -> usize {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| i.docs.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl SchemaStore for InMemoryStore {
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.indices.lock().unwrap().contains_key(name))
    }

    async fn create_index(&self, name: &str, body: &Value) -> Result<(), StoreError> {
        let mut indices = self.indices.lock().unwrap();
        if indices.contains_key(name) {
            return Err(StoreError::IndexAlreadyExists(name.to_string()));
        }
        indices.insert(
            name.to_string(),
            StoredIndex {
                definition: body.clone(),
                docs: Vec::new(),
            },
        );
        Ok(())
    }

    async fn index_document(&self, index: &str, doc: &Value) -> Result<(), StoreError> {
        let mut indices = self.indices.lock().unwrap();
        // The real store auto-creates an index on first insert
        let entry = indices.entry(index.to_string()).or_insert_with(|| StoredIndex {
            definition: json!({}),
            docs: Vec::new(),
        });
        entry.docs.push(doc.clone());
        Ok(())
    }

    async fn search_all(&self, index: &str, size: usize) -> Result<Vec<Value>, StoreError> {
        let indices = self.indices.lock().unwrap();
        Ok(indices
            .get(index)
            .map(|i| i.docs.iter().take(size).cloned().collect())
            .unwrap_or_default())
    }
}

/// Migration that creates an index with a trivial mapping, tolerating
/// re-invocation the way real migration bodies must.
pub fn create_index_migration(identity: &str, description: &str, index: &str) -> Migration {
    let index = index.to_string();
    Migration::new(identity, description, move |store: Arc<dyn SchemaStore>| {
        let index = index.clone();
        async move {
            let mapping = json!({
                "mappings": {
                    "properties": {
                        "test_field": { "type": "keyword" }
                    }
                }
            });
            match store.create_index(&index, &mapping).await {
                Ok(()) | Err(StoreError::IndexAlreadyExists(_)) => Ok(()),
                Err(e) => Err(e),
            }
        }
    })
}

/// Migration that records its own version in `log` when its body runs,
/// for asserting execution order.
pub fn logging_migration(
    identity: &str,
    description: &str,
    log: Arc<Mutex<Vec<String>>>,
) -> Migration {
    let version = esmigrate::compute_version(identity, description);
    Migration::new(identity, description, move |_store: Arc<dyn SchemaStore>| {
        let log = Arc::clone(&log);
        let version = version.clone();
        async move {
            log.lock().unwrap().push(version);
            Ok(())
        }
    })
}

/// Migration whose body always fails.
pub fn failing_migration(identity: &str, description: &str) -> Migration {
    Migration::new(identity, description, |_store: Arc<dyn SchemaStore>| async {
        Err(StoreError::Migration("simulated failure".to_string()))
    })
}
