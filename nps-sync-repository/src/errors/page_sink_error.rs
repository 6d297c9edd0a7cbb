//! Page sink error types.

use thiserror::Error;

/// Errors from page sink operations.
#[derive(Debug, Clone, Error)]
pub enum PageSinkError {
    /// Failed to reach the external table service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The external service rejected the request.
    ///
    /// `code` is the service's machine-readable error code when one was
    /// returned (e.g. `validation_error`, `object_not_found`).
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Failed to parse a response from the external service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The sink was configured with invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PageSinkError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an API error.
    pub fn api(status: u16, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The error's own message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError(msg) | Self::ParseError(msg) | Self::ConfigError(msg) => msg,
            Self::Api { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for PageSinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}
