//! Elasticsearch-backed implementation of [`SchemaStore`].
//!
//! A thin wrapper over the REST API: HEAD for index existence, PUT for index
//! creation, `_doc?refresh=true` for immediately-visible inserts and a
//! match_all `_search` for bounded scans. No retries and no timeout layer
//! beyond what reqwest provides.

use crate::store::{SchemaStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

/// Client for an Elasticsearch-compatible schema store.
pub struct EsClient {
    http: Client,
    base_url: String,
}

impl EsClient {
    /// Create a client for the store at `base_url`
    /// (e.g. `http://localhost:9200`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let http = Client::builder()
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map transport-level failures: connect errors mean the store is
    /// unreachable, anything else is a failed request.
    fn transport_error(e: reqwest::Error) -> StoreError {
        if e.is_connect() || e.is_timeout() {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Request(e.to_string())
        }
    }

    async fn error_body(response: Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) if !body.is_empty() => format!("{status}: {body}"),
            _ => status.to_string(),
        }
    }
}

#[async_trait]
impl SchemaStore for EsClient {
    async fn index_exists(&self, name: &str) -> Result<bool, StoreError> {
        let response = self
            .http
            .head(self.url(name))
            .send()
            .await
            .map_err(Self::transport_error)?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(StoreError::Response(Self::error_body(response).await)),
        }
    }

    async fn create_index(&self, name: &str, body: &Value) -> Result<(), StoreError> {
        let response = self
            .http
            .put(self.url(name))
            .json(body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        let detail = Self::error_body(response).await;
        if detail.contains("resource_already_exists_exception") {
            return Err(StoreError::IndexAlreadyExists(name.to_string()));
        }
        Err(StoreError::Request(detail))
    }

    async fn index_document(&self, index: &str, doc: &Value) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url(&format!("{index}/_doc")))
            .query(&[("refresh", "true")])
            .json(doc)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Request(Self::error_body(response).await))
        }
    }

    async fn search_all(&self, index: &str, size: usize) -> Result<Vec<Value>, StoreError> {
        let query = json!({
            "query": { "match_all": {} },
            "size": size,
        });

        let response = self
            .http
            .post(self.url(&format!("{index}/_search")))
            .json(&query)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(StoreError::Request(Self::error_body(response).await));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Response(e.to_string()))?;

        let hits = body["hits"]["hits"]
            .as_array()
            .ok_or_else(|| StoreError::Response("missing hits in search response".to_string()))?;

        Ok(hits.iter().map(|hit| hit["_source"].clone()).collect())
    }
}
