//! # NPS Sync Repository
//!
//! This crate provides the record types and the two outbound interfaces of the
//! NPS sync service: a [`DocumentStore`] that answers equality queries against
//! document collections, and a [`PageSink`] that creates pages in an external
//! table service. It includes concrete implementations for Firestore (REST)
//! and Notion, plus in-memory implementations for local runs and tests.

pub mod config;
pub mod errors;
pub mod firestore;
pub mod interfaces;
pub mod memory;
pub mod notion;
pub mod types;
pub mod utils;

pub use config::{FirestoreAuth, FirestoreConfig, NotionConfig, NotionSchema};
pub use errors::{PageSinkError, StoreError};
pub use firestore::FirestoreStore;
pub use interfaces::{DocumentStore, EqualityQuery, PageSink};
pub use memory::{MemoryPageSink, MemoryStore};
pub use notion::NotionPageSink;
pub use types::{
    CreatedPage, ExternalPage, HomeRecord, PageProperties, RecordRef, StoredDocument, SurveyRecord,
    UserRecord,
};
pub use utils::document_id_from_name;
