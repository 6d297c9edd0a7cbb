//! Home and user lookups.
//!
//! Each lookup is one equality query limited to a single document; the first
//! match wins and no match is `Ok(None)`, not an error. An empty reference is
//! never looked up.

use std::sync::Arc;

use nps_sync_repository::types::{home_fields, user_fields};
use nps_sync_repository::{
    DocumentStore, EqualityQuery, HomeRecord, RecordRef, StoredDocument, UserRecord,
};
use tracing::debug;

use crate::errors::SyncError;

/// Collections the lookups read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCollections {
    pub homes: String,
    pub users: String,
}

impl Default for LookupCollections {
    fn default() -> Self {
        Self {
            homes: "homes".to_string(),
            users: "users".to_string(),
        }
    }
}

/// Finds the home and the user a survey refers to.
#[derive(Clone)]
pub struct LookupService {
    store: Arc<dyn DocumentStore>,
    collections: LookupCollections,
}

impl LookupService {
    pub fn new(store: Arc<dyn DocumentStore>, collections: LookupCollections) -> Self {
        Self { store, collections }
    }

    /// Find the home whose reference equals `home_ref`, compared with its
    /// stored type.
    pub async fn find_home_by_ref(
        &self,
        home_ref: &RecordRef,
    ) -> Result<Option<HomeRecord>, SyncError> {
        let home = self
            .first_match(&self.collections.homes, home_fields::HOME_REF, home_ref)
            .await?
            .map(|doc| HomeRecord::from_document(&doc));

        debug!(home_ref = %home_ref, found = home.is_some(), "Home lookup");
        Ok(home)
    }

    /// Find the user whose reference equals `user_ref`, compared with its
    /// stored type.
    pub async fn find_user_by_ref(
        &self,
        user_ref: &RecordRef,
    ) -> Result<Option<UserRecord>, SyncError> {
        let user = self
            .first_match(&self.collections.users, user_fields::USER_REF, user_ref)
            .await?
            .map(|doc| UserRecord::from_document(&doc));

        debug!(user_ref = %user_ref, found = user.is_some(), "User lookup");
        Ok(user)
    }

    async fn first_match(
        &self,
        collection: &str,
        field: &str,
        reference: &RecordRef,
    ) -> Result<Option<StoredDocument>, SyncError> {
        if reference.is_empty() {
            debug!(collection = %collection, "Empty reference, skipping lookup");
            return Ok(None);
        }

        let query = EqualityQuery::new(collection, field, reference.value().clone()).limit(1);
        let documents = self
            .store
            .query_equal(&query)
            .await
            .map_err(SyncError::Lookup)?;
        Ok(documents.into_iter().next())
    }
}
