//! Environment configuration for the sync service.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use nps_sync_repository::config::{
    DEFAULT_FIRESTORE_API_URL, DEFAULT_FIRESTORE_DATABASE, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_NOTION_API_URL, DEFAULT_NOTION_VERSION,
};
use nps_sync_repository::{FirestoreAuth, FirestoreConfig, NotionConfig};
use tracing::warn;

use crate::lookup::LookupCollections;
use crate::mapper::MappingStrategy;
use crate::migrator::SurveySelection;
use crate::AppError;

/// Default port of the HTTP server.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Deployment environment, which decides how much error detail is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: Option<String>) -> Self {
        match value.as_deref().map(str::to_lowercase).as_deref() {
            Some("development") | Some("dev") => Self::Development,
            _ => Self::Production,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// `None` only in dry-run mode.
    pub notion: Option<NotionConfig>,
    /// Database pages are created in.
    pub notion_database_id: String,
    pub firestore: FirestoreConfig,
    pub surveys: SurveySelection,
    pub lookups: LookupCollections,
    pub strategy: MappingStrategy,
    pub dry_run: bool,
    pub environment: Environment,
    pub bind_addr: SocketAddr,
}

impl SyncConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `NOTION_TOKEN`: Notion integration token (required unless `DRY_RUN=true`)
    /// - `NOTION_DATABASE_ID`: Database pages are created in (required)
    /// - `NOTION_API_URL`: Notion API base URL (default: https://api.notion.com/v1)
    /// - `NOTION_VERSION`: Notion API version (default: 2022-06-28)
    /// - `FIRESTORE_PROJECT_ID`: Google Cloud project (required)
    /// - `FIRESTORE_DATABASE_ID`: Firestore database (default: "(default)")
    /// - `FIRESTORE_EMULATOR_HOST`: Use a local emulator at this host:port
    /// - `FIRESTORE_API_URL`: Firestore API base URL (default: https://firestore.googleapis.com/v1)
    /// - `FIRESTORE_ACCESS_TOKEN`: fixed bearer token for Firestore, never refreshed
    ///   (default: Google Application Default Credentials, or none with an emulator)
    /// - `SURVEY_COLLECTION` / `HOME_COLLECTION` / `USER_COLLECTION`: collection names
    ///   (default: nps / homes / users)
    /// - `SURVEY_ROUND`: round tag to sync (default: home)
    /// - `MAPPING_STRATEGY`: "enriched" or "flat" (default: enriched)
    /// - `DRY_RUN`: record pages in memory instead of sending them (default: false)
    /// - `APP_ENV`: "development" exposes error chains in responses (default: production)
    /// - `SERVER_HOST` / `SERVER_PORT` (or `PORT`): bind address (default: 0.0.0.0:8080)
    /// - `HTTP_TIMEOUT_SECS`: outbound request timeout (default: 30)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| AppError::config(format!("{} must be set", key)));

        let dry_run = parse_bool(var("DRY_RUN"));
        let timeout = var("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        let notion_database_id = required("NOTION_DATABASE_ID")?;
        let notion = match var("NOTION_TOKEN") {
            Some(token) => Some(NotionConfig {
                base_url: var("NOTION_API_URL").unwrap_or_else(|| DEFAULT_NOTION_API_URL.to_string()),
                version: var("NOTION_VERSION").unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
                timeout,
                ..NotionConfig::new(token)
            }),
            None if dry_run => None,
            None => return Err(AppError::config("NOTION_TOKEN must be set")),
        };

        let mut firestore = FirestoreConfig {
            base_url: var("FIRESTORE_API_URL").unwrap_or_else(|| DEFAULT_FIRESTORE_API_URL.to_string()),
            database_id: var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_string()),
            auth: var("FIRESTORE_ACCESS_TOKEN")
                .map(FirestoreAuth::Static)
                .unwrap_or(FirestoreAuth::ApplicationDefault),
            timeout,
            ..FirestoreConfig::new(required("FIRESTORE_PROJECT_ID")?)
        };
        if let Some(host) = var("FIRESTORE_EMULATOR_HOST") {
            firestore = firestore.with_emulator_host(&host);
        }

        let surveys = SurveySelection {
            collection: var("SURVEY_COLLECTION").unwrap_or_else(|| "nps".to_string()),
            round_tag: var("SURVEY_ROUND").unwrap_or_else(|| "home".to_string()),
        };
        let lookups = LookupCollections {
            homes: var("HOME_COLLECTION").unwrap_or_else(|| "homes".to_string()),
            users: var("USER_COLLECTION").unwrap_or_else(|| "users".to_string()),
        };

        let strategy = match var("MAPPING_STRATEGY") {
            Some(raw) => raw.parse::<MappingStrategy>().unwrap_or_else(|e| {
                warn!(error = %e, "Invalid MAPPING_STRATEGY, defaulting to 'enriched'");
                MappingStrategy::Enriched
            }),
            None => MappingStrategy::Enriched,
        };

        let host = match var("SERVER_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| AppError::config(format!("Invalid SERVER_HOST '{}': {}", raw, e)))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match var("SERVER_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid server port '{}': {}", raw, e)))?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            notion,
            notion_database_id,
            firestore,
            surveys,
            lookups,
            strategy,
            dry_run,
            environment: Environment::parse(var("APP_ENV")),
            bind_addr: SocketAddr::new(host, port),
        })
    }

    /// Whether error chains may be exposed in responses.
    pub fn expose_error_details(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_bool(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_lowercase).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}
