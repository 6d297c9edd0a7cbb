//! Notion implementation of the page sink.
//!
//! Pages are created in a Notion database through `POST /v1/pages`; the page
//! properties are mapped onto the database's columns by [`NotionSchema`].
//!
//! [`NotionSchema`]: crate::config::NotionSchema

mod payload;
mod provider;

pub use payload::{CreatePageRequest, PropertyValue};
pub use provider::NotionPageSink;
