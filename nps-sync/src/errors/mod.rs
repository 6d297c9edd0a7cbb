//! Error types for the sync service.

use nps_sync_repository::{PageSinkError, StoreError};
use thiserror::Error;

/// Errors that can occur while syncing surveys.
///
/// Each variant names the step that failed, so a caller can tell a failed
/// survey query (fatal for a whole migration) from a failed lookup or page
/// creation (fatal only for one record).
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// Querying the eligible surveys failed.
    #[error("Survey query failed: {0}")]
    Query(#[source] StoreError),

    /// Looking up a home or user failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[source] StoreError),

    /// Creating the external page failed.
    #[error("Page creation failed: {0}")]
    Create(#[from] PageSinkError),
}

impl SyncError {
    /// Stable, machine-readable name of the failed step.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Lookup(_) => "lookup",
            Self::Create(_) => "create",
        }
    }

    /// Message of the underlying store or sink error, without any prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Query(e) | Self::Lookup(e) => e.message(),
            Self::Create(e) => e.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_message() {
        let err = SyncError::Lookup(StoreError::connection("timed out"));
        assert_eq!(err.kind(), "lookup");
        assert_eq!(err.to_string(), "Lookup failed: Connection error: timed out");

        assert_eq!(err.message(), "timed out");

        let err: SyncError = PageSinkError::api(400, "validation_error", "bad").into();
        assert_eq!(err.kind(), "create");
        assert_eq!(err.message(), "bad");
    }
}
