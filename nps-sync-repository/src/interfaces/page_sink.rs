//! Page sink trait definition.

use async_trait::async_trait;

use crate::errors::PageSinkError;
use crate::types::{CreatedPage, ExternalPage};

/// Abstracts the external table service pages are created in.
///
/// There is no update or upsert: every call creates a new page, so creating
/// the same `ExternalPage` twice yields two pages.
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Create one page.
    ///
    /// # Returns
    ///
    /// * `Ok(CreatedPage)` - The identifier assigned by the service
    /// * `Err(PageSinkError)` - If the service could not be reached or rejected the page
    async fn create_page(&self, page: &ExternalPage) -> Result<CreatedPage, PageSinkError>;
}
