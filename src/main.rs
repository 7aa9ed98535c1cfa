mod client;
mod migration;
mod store;
mod tracking;
mod version;

use clap::Parser;
use client::EsClient;
use migration::{Migration, MigrationManager};
use serde_json::json;
use store::{SchemaStore, StoreError};
use tracking::{FileTracker, IndexTracker, TrackingStore};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_URL: &str = "http://localhost:9200";

/// esmigrate - schema migration runner for Elasticsearch-style stores
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema store URL
    #[arg(short, long, env = "ESMIGRATE_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Track applied versions in a local JSON file at this path instead of
    /// the reserved index inside the store
    #[arg(short, long, env = "ESMIGRATE_FILE")]
    file: Option<String>,
}

async fn create_users_index(store: Arc<dyn SchemaStore>) -> Result<(), StoreError> {
    if store.index_exists("users").await? {
        return Ok(());
    }

    let mapping = json!({
        "mappings": {
            "properties": {
                "name":       { "type": "text" },
                "email":      { "type": "keyword" },
                "created_at": { "type": "date" }
            }
        }
    });

    match store.create_index("users", &mapping).await {
        Ok(()) | Err(StoreError::IndexAlreadyExists(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let store: Arc<dyn SchemaStore> = Arc::new(EsClient::new(&args.url)?);

    let tracker: Box<dyn TrackingStore> = match &args.file {
        Some(path) => Box::new(FileTracker::new(path)),
        None => Box::new(IndexTracker::new(Arc::clone(&store))),
    };

    let mut manager = MigrationManager::new(store, tracker);
    manager.register(Migration::new(
        "create_users_index",
        "Create users index",
        create_users_index,
    ))?;

    let summary = manager.run().await?;
    info!(
        applied = summary.applied.len(),
        skipped = summary.skipped.len(),
        "Migration run complete"
    );

    Ok(())
}
