//! In-memory implementations of the store and the sink.
//!
//! `MemoryStore` holds documents per collection and answers equality queries
//! in insertion order, comparing values by type the way Firestore does.
//! `MemoryPageSink` records the pages it is asked to create, optionally only
//! the most recent ones. Both can be told to fail, which lets callers exercise their error
//! paths without a network.
//!
//! # Example
//!
//! ```
//! use nps_sync_repository::{MemoryStore, StoredDocument};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.insert("homes", StoredDocument::from_json("h1", json!({ "hid": "H1", "name": "Villa Azul" })));
//! assert_eq!(store.len("homes"), 1);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::errors::{PageSinkError, StoreError};
use crate::interfaces::{DocumentStore, EqualityQuery, PageSink};
use crate::types::{CreatedPage, ExternalPage, StoredDocument};

/// Document store kept in memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    failing_collections: RwLock<HashMap<String, String>>,
    queries: RwLock<Vec<EqualityQuery>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to a collection.
    pub fn insert(&self, collection: &str, document: StoredDocument) {
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections
            .read()
            .unwrap()
            .values()
            .all(Vec::is_empty)
    }

    /// Make every query against `collection` fail with a connection error.
    pub fn fail_collection(&self, collection: &str, message: impl Into<String>) {
        self.failing_collections
            .write()
            .unwrap()
            .insert(collection.to_string(), message.into());
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<EqualityQuery> {
        self.queries.read().unwrap().clone()
    }

    /// Strings equal strings and numbers equal numbers (`1 == 1.0`); a
    /// string never equals a number.
    fn matches(document: &StoredDocument, field: &str, value: &Value) -> bool {
        match (document.fields.get(field), value) {
            (Some(Value::String(a)), Value::String(b)) => a == b,
            (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
            (Some(Value::Bool(a)), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_equal(&self, query: &EqualityQuery) -> Result<Vec<StoredDocument>, StoreError> {
        self.queries.write().unwrap().push(query.clone());

        if let Some(message) = self.failing_collections.read().unwrap().get(&query.collection) {
            return Err(StoreError::connection(message.clone()));
        }

        let collections = self.collections.read().unwrap();
        let matches = collections
            .get(&query.collection)
            .into_iter()
            .flatten()
            .filter(|doc| Self::matches(doc, &query.field, &query.value))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(matches)
    }
}

/// Page sink that records pages instead of sending them.
#[derive(Default)]
pub struct MemoryPageSink {
    pages: RwLock<VecDeque<ExternalPage>>,
    created: AtomicUsize,
    /// Keep at most this many pages, dropping the oldest.
    capacity: Option<usize>,
    failing_titles: RwLock<HashSet<String>>,
    fail_all: RwLock<Option<String>>,
}

impl MemoryPageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that only keeps the `capacity` most recent pages.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Reject every page whose title equals `title`.
    pub fn fail_on_title(&self, title: impl Into<String>) {
        self.failing_titles.write().unwrap().insert(title.into());
    }

    /// Reject every page with the given message.
    pub fn fail_all(&self, message: impl Into<String>) {
        *self.fail_all.write().unwrap() = Some(message.into());
    }

    /// Pages still held, oldest first.
    pub fn pages(&self) -> Vec<ExternalPage> {
        self.pages.read().unwrap().iter().cloned().collect()
    }

    /// Pages created so far, including any no longer held.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSink for MemoryPageSink {
    async fn create_page(&self, page: &ExternalPage) -> Result<CreatedPage, PageSinkError> {
        if let Some(ref message) = *self.fail_all.read().unwrap() {
            return Err(PageSinkError::api(500, "internal_server_error", message.clone()));
        }
        if self
            .failing_titles
            .read()
            .unwrap()
            .contains(&page.properties.title)
        {
            return Err(PageSinkError::api(
                400,
                "validation_error",
                format!("page '{}' rejected", page.properties.title),
            ));
        }

        let mut pages = self.pages.write().unwrap();
        if let Some(capacity) = self.capacity {
            while !pages.is_empty() && pages.len() >= capacity {
                pages.pop_front();
            }
        }
        if self.capacity != Some(0) {
            pages.push_back(page.clone());
        }

        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        info!(title = %page.properties.title, n, "Recorded page in memory");

        Ok(CreatedPage {
            id: format!("memory-page-{}", n),
            url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageProperties;
    use serde_json::json;

    fn page(title: &str) -> ExternalPage {
        ExternalPage {
            parent_id: "db".to_string(),
            properties: PageProperties {
                title: title.to_string(),
                score: 0,
                comment: String::new(),
                date: "2024-01-01".to_string(),
                owner: "owner".to_string(),
                destination: None,
            },
        }
    }

    #[tokio::test]
    async fn test_query_equal_filters_and_limits() {
        let store = MemoryStore::new();
        store.insert("nps", StoredDocument::from_json("a", json!({ "round": "home" })));
        store.insert("nps", StoredDocument::from_json("b", json!({ "round": "checkin" })));
        store.insert("nps", StoredDocument::from_json("c", json!({ "round": "home" })));

        let all = store
            .query_equal(&EqualityQuery::new("nps", "round", "home"))
            .await
            .unwrap();
        assert_eq!(
            all.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        let first = store
            .query_equal(&EqualityQuery::new("nps", "round", "home").limit(1))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "a");
    }

    #[tokio::test]
    async fn test_query_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let result = store
            .query_equal(&EqualityQuery::new("homes", "hid", "H1"))
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_query_compares_by_type() {
        let store = MemoryStore::new();
        store.insert("homes", StoredDocument::from_json("a", json!({ "hid": 42 })));
        store.insert("homes", StoredDocument::from_json("b", json!({ "hid": "42" })));

        let numeric = store
            .query_equal(&EqualityQuery::new("homes", "hid", 42))
            .await
            .unwrap();
        assert_eq!(numeric.len(), 1);
        assert_eq!(numeric[0].id, "a");

        let text = store
            .query_equal(&EqualityQuery::new("homes", "hid", "42"))
            .await
            .unwrap();
        assert_eq!(text.len(), 1);
        assert_eq!(text[0].id, "b");

        let double = store
            .query_equal(&EqualityQuery::new("homes", "hid", 42.0))
            .await
            .unwrap();
        assert_eq!(double[0].id, "a");
    }

    #[tokio::test]
    async fn test_failing_collection() {
        let store = MemoryStore::new();
        store.fail_collection("users", "unavailable");

        let result = store
            .query_equal(&EqualityQuery::new("users", "uid", "U1"))
            .await;

        assert!(matches!(result, Err(StoreError::ConnectionError(_))));
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_sink_records_pages_and_assigns_ids() {
        let sink = MemoryPageSink::new();

        let first = sink.create_page(&page("A")).await.unwrap();
        let second = sink.create_page(&page("A")).await.unwrap();

        assert_eq!(first.id, "memory-page-1");
        assert_eq!(second.id, "memory-page-2");
        assert_eq!(sink.created_count(), 2);
    }

    #[tokio::test]
    async fn test_bounded_sink_keeps_most_recent_pages() {
        let sink = MemoryPageSink::bounded(2);

        for title in ["A", "B", "C"] {
            sink.create_page(&page(title)).await.unwrap();
        }

        let titles: Vec<_> = sink.pages().into_iter().map(|p| p.properties.title).collect();
        assert_eq!(titles, vec!["B", "C"]);
        assert_eq!(sink.created_count(), 3);
    }

    #[tokio::test]
    async fn test_sink_failure_injection() {
        let sink = MemoryPageSink::new();
        sink.fail_on_title("B");

        assert!(sink.create_page(&page("A")).await.is_ok());
        assert!(sink.create_page(&page("B")).await.is_err());

        sink.fail_all("down");
        assert!(sink.create_page(&page("A")).await.is_err());
        assert_eq!(sink.created_count(), 1);
    }
}
