//! Firestore REST provider.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use super::value::{document_from_json, encode_value};
use crate::config::{FirestoreAuth, FirestoreConfig, FIRESTORE_SCOPE};
use crate::errors::StoreError;
use crate::interfaces::{DocumentStore, EqualityQuery};
use crate::types::StoredDocument;

/// Document store backed by the Firestore REST API.
///
/// # Example
///
/// ```ignore
/// use nps_sync_repository::{DocumentStore, EqualityQuery, FirestoreConfig, FirestoreStore};
///
/// let store = FirestoreStore::new(FirestoreConfig::new("my-project"))?;
/// let homes = store
///     .query_equal(&EqualityQuery::new("homes", "hid", "H1").limit(1))
///     .await?;
/// ```
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
    run_query_url: Url,
    /// Resolved on the first query that needs Google credentials.
    token_provider: OnceCell<Arc<dyn TokenProvider>>,
}

impl FirestoreStore {
    /// Create a store for the configured project and database.
    ///
    /// # Returns
    ///
    /// * `Ok(FirestoreStore)` - A new store instance
    /// * `Err(StoreError)` - If the project id is empty, the URL is invalid or
    ///   the HTTP client cannot be built
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::config("Firestore project id is required"));
        }

        let run_query_url = Url::parse(&config.run_query_url())
            .map_err(|e| StoreError::config(format!("Invalid Firestore URL: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(
            url = %run_query_url,
            project_id = %config.project_id,
            database_id = %config.database_id,
            auth = ?config.auth,
            "Created Firestore store"
        );

        Ok(Self {
            client,
            config,
            run_query_url,
            token_provider: OnceCell::new(),
        })
    }

    /// Bearer token for the next request, if the configuration uses one.
    ///
    /// Google credentials are cached by the token provider, which refreshes
    /// them shortly before they expire.
    async fn bearer_token(&self) -> Result<Option<String>, StoreError> {
        match &self.config.auth {
            FirestoreAuth::None => Ok(None),
            FirestoreAuth::Static(token) => Ok(Some(token.clone())),
            FirestoreAuth::ApplicationDefault => {
                let provider = self
                    .token_provider
                    .get_or_try_init(|| async {
                        gcp_auth::provider().await.map_err(|e| {
                            StoreError::auth(format!("No Google credentials found: {}", e))
                        })
                    })
                    .await?;

                let token = provider
                    .token(&[FIRESTORE_SCOPE])
                    .await
                    .map_err(|e| StoreError::auth(format!("Failed to fetch access token: {}", e)))?;

                Ok(Some(token.as_str().to_string()))
            }
        }
    }

    /// Build the `runQuery` request body for an equality query.
    pub(crate) fn run_query_body(query: &EqualityQuery) -> Value {
        let mut structured = json!({
            "from": [{ "collectionId": query.collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": query.field },
                    "op": "EQUAL",
                    "value": encode_value(&query.value)
                }
            }
        });

        if let Some(limit) = query.limit {
            structured["limit"] = json!(limit);
        }

        json!({ "structuredQuery": structured })
    }

    /// Collect the documents out of a `runQuery` response stream.
    ///
    /// Each element carries at most one document; elements without one
    /// (progress markers, `readTime`-only entries) are skipped.
    pub(crate) fn parse_run_query_response(
        items: &[Value],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        items
            .iter()
            .filter_map(|item| item.get("document"))
            .map(document_from_json)
            .collect()
    }

    /// Pull a human readable message out of a Firestore error body.
    fn error_message(body: &str) -> String {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let error = parsed.as_ref().and_then(|v| match v {
            Value::Array(items) => items.iter().find_map(|item| item.get("error")),
            other => other.get("error"),
        });

        error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn query_equal(&self, query: &EqualityQuery) -> Result<Vec<StoredDocument>, StoreError> {
        let body = Self::run_query_body(query);

        let mut request = self.client.post(self.run_query_url.clone()).json(&body);
        if let Some(token) = self.bearer_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::request(
                status.as_u16(),
                Self::error_message(&text),
            ));
        }

        let items: Vec<Value> = response.json().await?;
        let documents = Self::parse_run_query_response(&items)?;

        debug!(
            collection = %query.collection,
            field = %query.field,
            value = %query.value,
            matches = documents.len(),
            "Firestore query completed"
        );

        Ok(documents)
    }
}
