//! Notion API provider.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::payload::CreatePageRequest;
use crate::config::NotionConfig;
use crate::errors::PageSinkError;
use crate::interfaces::PageSink;
use crate::types::{CreatedPage, ExternalPage};

const NOTION_VERSION_HEADER: &str = "notion-version";

/// Page sink backed by the Notion API.
pub struct NotionPageSink {
    client: Client,
    config: NotionConfig,
    pages_url: Url,
}

/// Successful create-page response; only the fields we keep.
#[derive(Debug, Deserialize)]
struct PageResponse {
    id: String,
    url: Option<String>,
}

/// Notion error body (`{"object": "error", ...}`).
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionPageSink {
    /// Create a sink authenticated with the configured integration token.
    ///
    /// # Returns
    ///
    /// * `Ok(NotionPageSink)` - A new sink instance
    /// * `Err(PageSinkError)` - If the token is empty or not a valid header
    ///   value, the URL is invalid, or the HTTP client cannot be built
    pub fn new(config: NotionConfig) -> Result<Self, PageSinkError> {
        if config.token.trim().is_empty() {
            return Err(PageSinkError::config("Notion token is required"));
        }

        let pages_url = Url::parse(&config.pages_url())
            .map_err(|e| PageSinkError::config(format!("Invalid Notion URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| PageSinkError::config(format!("Invalid Notion token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_str(&config.version)
                .map_err(|e| PageSinkError::config(format!("Invalid Notion version: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PageSinkError::connection(e.to_string()))?;

        info!(
            url = %pages_url,
            notion_version = %config.version,
            "Created Notion page sink"
        );

        Ok(Self {
            client,
            config,
            pages_url,
        })
    }

    /// Turn a non-success response body into a `PageSinkError::Api`.
    fn api_error(status: u16, body: &str) -> PageSinkError {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) if !err.message.is_empty() => PageSinkError::api(status, err.code, err.message),
            _ => PageSinkError::api(status, "unknown", body),
        }
    }
}

#[async_trait]
impl PageSink for NotionPageSink {
    async fn create_page(&self, page: &ExternalPage) -> Result<CreatedPage, PageSinkError> {
        let request = CreatePageRequest::from_page(page, &self.config.schema);

        let response = self
            .client
            .post(self.pages_url.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), &body));
        }

        let created: PageResponse = response.json().await?;
        debug!(page_id = %created.id, "Created Notion page");

        Ok(CreatedPage {
            id: created.id,
            url: created.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_token() {
        let result = NotionPageSink::new(NotionConfig::new(""));
        assert!(matches!(result, Err(PageSinkError::ConfigError(_))));
    }

    #[test]
    fn test_new_rejects_token_with_newline() {
        let result = NotionPageSink::new(NotionConfig::new("secret\nvalue"));
        assert!(matches!(result, Err(PageSinkError::ConfigError(_))));
    }

    #[test]
    fn test_api_error_from_notion_body() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#;

        match NotionPageSink::api_error(404, body) {
            PageSinkError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "object_not_found");
                assert_eq!(message, "Could not find database");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_from_unparseable_body() {
        let err = NotionPageSink::api_error(502, "Bad Gateway");
        assert_eq!(err.to_string(), "API error (502 unknown): Bad Gateway");
    }
}
