//! Document store trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;
use crate::types::StoredDocument;

/// An equality filter against one collection: `collection.field == value`.
///
/// The value keeps its JSON type; backends compare strings with strings and
/// numbers with numbers, never across the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityQuery {
    pub collection: String,
    pub field: String,
    pub value: Value,
    /// Maximum number of documents to return. `None` returns every match.
    pub limit: Option<usize>,
}

impl EqualityQuery {
    pub fn new(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            value: value.into(),
            limit: None,
        }
    }

    /// Restrict the query to at most `limit` documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Abstracts the document database the survey records live in.
///
/// Implementations return matches in the order the backend defines; callers
/// that only need one match take the first. A backend failure is returned as
/// `StoreError` and is never retried here.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run an equality query and return the matching documents.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<StoredDocument>)` - The matches, possibly empty
    /// * `Err(StoreError)` - If the backend could not be queried
    async fn query_equal(&self, query: &EqualityQuery) -> Result<Vec<StoredDocument>, StoreError>;
}
