//! Utility functions for the NPS sync repository.

/// Extract the document id from a Firestore resource name.
///
/// Names look like
/// `projects/{project}/databases/{database}/documents/{collection}/{id}`; the
/// id is the last path segment. A bare id is returned unchanged.
///
/// # Example
///
/// ```
/// use nps_sync_repository::document_id_from_name;
///
/// let id = document_id_from_name("projects/p/databases/(default)/documents/nps/abc123");
/// assert_eq!(id, "abc123");
/// ```
pub fn document_id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_from_full_name() {
        assert_eq!(
            document_id_from_name("projects/p/databases/(default)/documents/nps/doc-1"),
            "doc-1"
        );
    }

    #[test]
    fn test_document_id_from_bare_id() {
        assert_eq!(document_id_from_name("doc-1"), "doc-1");
    }
}
