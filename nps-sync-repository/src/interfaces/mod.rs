//! Interface definitions for the outbound dependencies.
//!
//! The traits here allow dependency injection of the document store and the
//! page sink, so the sync service can run against Firestore and Notion in
//! production and against in-memory implementations in tests.

mod document_store;
mod page_sink;

pub use document_store::{DocumentStore, EqualityQuery};
pub use page_sink::PageSink;
