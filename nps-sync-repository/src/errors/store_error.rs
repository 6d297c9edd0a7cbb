//! Document store error types.

use thiserror::Error;

/// Errors from document store operations.
///
/// Used by the `DocumentStore` trait and every implementation of it. A store
/// error is never retried by this crate; callers decide whether it is fatal.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Failed to reach the store backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}: {message}")]
    RequestError { status: u16, message: String },

    /// Failed to parse a response from the backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to obtain credentials for the backend.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The store was configured with invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error from a response status and body.
    pub fn request(status: u16, msg: impl Into<String>) -> Self {
        Self::RequestError {
            status,
            message: msg.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The error's own message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError(msg)
            | Self::ParseError(msg)
            | Self::AuthError(msg)
            | Self::ConfigError(msg) => msg,
            Self::RequestError { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message() {
        let err = StoreError::request(403, "permission denied");
        assert_eq!(
            err.to_string(),
            "Request failed with status 403: permission denied"
        );
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            StoreError::connection("refused"),
            StoreError::ConnectionError(_)
        ));
        assert!(matches!(StoreError::parse("bad"), StoreError::ParseError(_)));
        assert!(matches!(
            StoreError::config("missing project"),
            StoreError::ConfigError(_)
        ));
        assert!(matches!(StoreError::auth("no credentials"), StoreError::AuthError(_)));
    }

    #[test]
    fn test_message_drops_prefix() {
        assert_eq!(StoreError::request(403, "permission denied").message(), "permission denied");
        assert_eq!(StoreError::auth("no credentials").message(), "no credentials");
    }
}
