//! Dependency initialization and wiring for the sync service.

use std::sync::Arc;

use nps_sync_repository::{
    DocumentStore, FirestoreStore, MemoryPageSink, NotionPageSink, PageSink,
};
use tracing::{info, warn};

use super::settings::SyncConfig;
use crate::listener::ChangeListener;
use crate::lookup::LookupService;
use crate::mapper::RecordMapper;
use crate::migrator::BatchMigrator;
use crate::AppError;

/// Pages kept by the dry-run sink; older ones are dropped.
pub const DRY_RUN_PAGE_LIMIT: usize = 100;

/// Container for all initialized dependencies.
///
/// The store and sink clients are built once here and shared by the migrator
/// and the listener.
pub struct Dependencies {
    pub migrator: Arc<BatchMigrator>,
    pub listener: Arc<ChangeListener>,
}

impl Dependencies {
    /// Build the Firestore store and the Notion sink (or a bounded in-memory
    /// sink in dry-run mode) from the configuration and wire them together.
    pub fn new(config: &SyncConfig) -> Result<Self, AppError> {
        info!(
            project_id = %config.firestore.project_id,
            survey_collection = %config.surveys.collection,
            round = %config.surveys.round_tag,
            strategy = %config.strategy,
            dry_run = config.dry_run,
            "Initializing dependencies"
        );

        let store = FirestoreStore::new(config.firestore.clone()).map_err(|e| {
            AppError::config(format!("Failed to create Firestore store: {}", e))
        })?;

        let sink: Arc<dyn PageSink> = match (&config.notion, config.dry_run) {
            (_, true) => {
                warn!(
                    kept_pages = DRY_RUN_PAGE_LIMIT,
                    "Dry run enabled, pages are logged and not sent to Notion"
                );
                Arc::new(dry_run_sink())
            }
            (Some(notion), false) => Arc::new(NotionPageSink::new(notion.clone()).map_err(|e| {
                AppError::config(format!("Failed to create Notion page sink: {}", e))
            })?),
            (None, false) => return Err(AppError::config("NOTION_TOKEN must be set")),
        };

        Ok(Self::from_parts(Arc::new(store), sink, config))
    }

    /// Wire already built clients together.
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        sink: Arc<dyn PageSink>,
        config: &SyncConfig,
    ) -> Self {
        let lookup = LookupService::new(store.clone(), config.lookups.clone());
        let mapper = RecordMapper::new(lookup, config.strategy, &config.notion_database_id);

        let migrator = BatchMigrator::new(
            store,
            sink.clone(),
            mapper.clone(),
            config.surveys.clone(),
        );
        let listener = ChangeListener::new(sink, mapper, &config.surveys.round_tag);

        Self {
            migrator: Arc::new(migrator),
            listener: Arc::new(listener),
        }
    }
}

fn dry_run_sink() -> MemoryPageSink {
    MemoryPageSink::bounded(DRY_RUN_PAGE_LIMIT)
}
