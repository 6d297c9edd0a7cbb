//! Error types for the NPS sync repository.
//!
//! One error type per outbound dependency: the document store and the page sink.

mod page_sink_error;
mod store_error;

pub use page_sink_error::PageSinkError;
pub use store_error::StoreError;
