//! Migrator module.
//!
//! Copies every eligible survey into the page sink in one sequential pass.
//! A failure on one survey is recorded and the pass continues; only a failed
//! survey query aborts the run. Nothing is checkpointed, so running the pass
//! twice creates every page twice.

use std::sync::Arc;

use nps_sync_repository::types::survey_fields;
use nps_sync_repository::{DocumentStore, EqualityQuery, PageSink, SurveyRecord};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::errors::SyncError;
use crate::mapper::RecordMapper;

/// Which surveys a migration picks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySelection {
    /// Collection holding the surveys.
    pub collection: String,
    /// Only surveys whose round equals this tag are migrated.
    pub round_tag: String,
}

impl Default for SurveySelection {
    fn default() -> Self {
        Self {
            collection: "nps".to_string(),
            round_tag: "home".to_string(),
        }
    }
}

/// A survey that could not be migrated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationFailure {
    #[serde(rename = "docId")]
    pub doc_id: String,
    /// Message of the store or sink error.
    pub error: String,
    /// Failed step, see [`SyncError::kind`].
    pub kind: &'static str,
}

/// Outcome of one migration pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MigrationSummary {
    /// Surveys returned by the query.
    pub total: usize,
    /// Surveys for which a page was created.
    pub migrated: usize,
    /// Surveys that failed to map or to create.
    pub failed: usize,
    pub errors: Vec<MigrationFailure>,
}

/// Runs bulk migrations.
pub struct BatchMigrator {
    store: Arc<dyn DocumentStore>,
    sink: Arc<dyn PageSink>,
    mapper: RecordMapper,
    selection: SurveySelection,
}

impl BatchMigrator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn PageSink>,
        mapper: RecordMapper,
        selection: SurveySelection,
    ) -> Self {
        Self {
            store,
            sink,
            mapper,
            selection,
        }
    }

    /// Migrate every eligible survey.
    ///
    /// # Returns
    ///
    /// * `Ok(MigrationSummary)` - Counts and per-survey failures
    /// * `Err(SyncError::Query)` - If the eligible surveys could not be queried
    #[instrument(skip(self), fields(collection = %self.selection.collection, round = %self.selection.round_tag))]
    pub async fn run(&self) -> Result<MigrationSummary, SyncError> {
        let query = EqualityQuery::new(
            &self.selection.collection,
            survey_fields::ROUND,
            self.selection.round_tag.as_str(),
        );

        let documents = self.store.query_equal(&query).await.map_err(|e| {
            error!(error = %e, "Failed to query surveys");
            SyncError::Query(e)
        })?;

        if documents.is_empty() {
            info!("No surveys to migrate");
            return Ok(MigrationSummary::default());
        }

        let mut summary = MigrationSummary {
            total: documents.len(),
            ..MigrationSummary::default()
        };

        for document in &documents {
            let record = SurveyRecord::from_document(document);

            match self.migrate_one(&record).await {
                Ok(page_id) => {
                    summary.migrated += 1;
                    info!(doc_id = %record.survey_id, page_id = %page_id, "Migrated survey");
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(doc_id = %record.survey_id, kind = e.kind(), error = %e, "Failed to migrate survey");
                    summary.errors.push(MigrationFailure {
                        doc_id: record.survey_id.clone(),
                        error: e.message().to_string(),
                        kind: e.kind(),
                    });
                }
            }
        }

        info!(
            total = summary.total,
            migrated = summary.migrated,
            failed = summary.failed,
            "Migration finished"
        );

        Ok(summary)
    }

    async fn migrate_one(&self, record: &SurveyRecord) -> Result<String, SyncError> {
        let page = self.mapper.map(record).await?;
        let created = self.sink.create_page(&page).await?;
        Ok(created.id)
    }
}
