//! Listener module.
//!
//! Handles one newly created survey document. Ineligible or missing documents
//! are skipped; failures are returned to the caller so the delivering runtime
//! can apply its own redelivery policy.

use std::sync::Arc;

use nps_sync_repository::{CreatedPage, PageSink, StoredDocument, SurveyRecord};
use tracing::{info, instrument};

use crate::errors::SyncError;
use crate::mapper::RecordMapper;

/// Why a created document did not produce a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event carried no document.
    NoPayload,
    /// The survey belongs to another round.
    IneligibleRound,
}

/// Result of handling one created document.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerOutcome {
    Skipped(SkipReason),
    Created {
        survey_id: String,
        page: CreatedPage,
    },
}

/// Syncs surveys as they are created.
pub struct ChangeListener {
    sink: Arc<dyn PageSink>,
    mapper: RecordMapper,
    round_tag: String,
}

impl ChangeListener {
    pub fn new(sink: Arc<dyn PageSink>, mapper: RecordMapper, round_tag: impl Into<String>) -> Self {
        Self {
            sink,
            mapper,
            round_tag: round_tag.into(),
        }
    }

    /// Handle a created document.
    ///
    /// # Returns
    ///
    /// * `Ok(ListenerOutcome::Skipped)` - No document, or not an eligible round
    /// * `Ok(ListenerOutcome::Created)` - A page was created
    /// * `Err(SyncError)` - A lookup or the page creation failed
    #[instrument(skip(self, document), fields(doc_id = document.map(|d| d.id.as_str()).unwrap_or("")))]
    pub async fn handle(
        &self,
        document: Option<&StoredDocument>,
    ) -> Result<ListenerOutcome, SyncError> {
        let Some(document) = document else {
            info!("No data associated with the event");
            return Ok(ListenerOutcome::Skipped(SkipReason::NoPayload));
        };

        let record = SurveyRecord::from_document(document);
        if record.round_tag != self.round_tag {
            info!(round = %record.round_tag, "Survey is not an eligible round, ignoring");
            return Ok(ListenerOutcome::Skipped(SkipReason::IneligibleRound));
        }

        let page = self.mapper.map(&record).await?;
        let created = self.sink.create_page(&page).await?;

        info!(page_id = %created.id, "Created page for new survey");

        Ok(ListenerOutcome::Created {
            survey_id: record.survey_id,
            page: created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupCollections, LookupService};
    use crate::mapper::MappingStrategy;
    use nps_sync_repository::{MemoryPageSink, MemoryStore};
    use serde_json::json;

    fn listener(store: Arc<MemoryStore>, sink: Arc<MemoryPageSink>) -> ChangeListener {
        let lookup = LookupService::new(store, LookupCollections::default());
        let mapper = RecordMapper::new(lookup, MappingStrategy::Enriched, "db-123");
        ChangeListener::new(sink, mapper, "home")
    }

    #[tokio::test]
    async fn test_missing_document_is_a_no_op() {
        let sink = Arc::new(MemoryPageSink::new());

        let outcome = listener(Arc::new(MemoryStore::new()), sink.clone())
            .handle(None)
            .await
            .unwrap();

        assert_eq!(outcome, ListenerOutcome::Skipped(SkipReason::NoPayload));
        assert_eq!(sink.created_count(), 0);
    }

    #[tokio::test]
    async fn test_other_round_creates_nothing() {
        let sink = Arc::new(MemoryPageSink::new());
        let doc = StoredDocument::from_json("s1", json!({ "hid": "H1", "round": "checkin" }));

        let outcome = listener(Arc::new(MemoryStore::new()), sink.clone())
            .handle(Some(&doc))
            .await
            .unwrap();

        assert_eq!(outcome, ListenerOutcome::Skipped(SkipReason::IneligibleRound));
        assert_eq!(sink.created_count(), 0);
    }

    #[tokio::test]
    async fn test_home_round_creates_page() {
        let store = Arc::new(MemoryStore::new());
        store.insert(
            "homes",
            StoredDocument::from_json("h", json!({ "hid": "H1", "name": "Villa Azul" })),
        );
        let sink = Arc::new(MemoryPageSink::new());
        let doc = StoredDocument::from_json(
            "s1",
            json!({ "hid": "H1", "uid": "U1", "round": "home", "nps": 10 }),
        );

        let outcome = listener(store, sink.clone()).handle(Some(&doc)).await.unwrap();

        match outcome {
            ListenerOutcome::Created { survey_id, page } => {
                assert_eq!(survey_id, "s1");
                assert_eq!(page.id, "memory-page-1");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let pages = sink.pages();
        assert_eq!(pages[0].properties.title, "Villa Azul");
        assert_eq!(pages[0].properties.score, 10);
    }

    #[tokio::test]
    async fn test_create_failure_is_returned() {
        let sink = Arc::new(MemoryPageSink::new());
        sink.fail_all("notion down");
        let doc = StoredDocument::from_json("s1", json!({ "hid": "H1", "round": "home" }));

        let result = listener(Arc::new(MemoryStore::new()), sink)
            .handle(Some(&doc))
            .await;

        assert!(matches!(result, Err(SyncError::Create(_))));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_returned() {
        let store = Arc::new(MemoryStore::new());
        store.fail_collection("homes", "unavailable");
        let sink = Arc::new(MemoryPageSink::new());
        let doc = StoredDocument::from_json("s1", json!({ "hid": "H1", "round": "home" }));

        let result = listener(store, sink.clone()).handle(Some(&doc)).await;

        assert!(matches!(result, Err(SyncError::Lookup(_))));
        assert_eq!(sink.created_count(), 0);
    }
}
