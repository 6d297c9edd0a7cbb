//! Configuration types for the Firestore store and the Notion page sink.

use std::fmt;
use std::time::Duration;

/// Default Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1";

/// Default Firestore database id.
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

/// Default Notion REST endpoint.
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// OAuth2 scope for Firestore requests made with Google credentials.
pub const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the Firestore REST API.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Base URL up to and including the API version (e.g. `https://firestore.googleapis.com/v1`).
    pub base_url: String,
    pub project_id: String,
    pub database_id: String,
    pub auth: FirestoreAuth,
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Create a config for the public Firestore endpoint and the default database.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_FIRESTORE_API_URL.to_string(),
            project_id: project_id.into(),
            database_id: DEFAULT_FIRESTORE_DATABASE.to_string(),
            auth: FirestoreAuth::default(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Point the config at a local emulator (`host:port`).
    ///
    /// Emulators accept unauthenticated requests, so Google credentials are
    /// dropped; an explicit static token is kept.
    pub fn with_emulator_host(mut self, host: &str) -> Self {
        self.base_url = format!("http://{}/v1", host.trim_end_matches('/'));
        if self.auth == FirestoreAuth::ApplicationDefault {
            self.auth = FirestoreAuth::None;
        }
        self
    }

    /// URL of the `runQuery` method for this project and database.
    pub fn run_query_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents:runQuery",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id
        )
    }
}

/// How requests to Firestore are authenticated.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum FirestoreAuth {
    /// Google Application Default Credentials. Access tokens are fetched and
    /// refreshed as they expire.
    #[default]
    ApplicationDefault,
    /// A fixed bearer token. It is never refreshed.
    Static(String),
    /// No credentials, for emulators.
    None,
}

impl fmt::Debug for FirestoreAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationDefault => f.write_str("ApplicationDefault"),
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::None => f.write_str("None"),
        }
    }
}

/// Connection settings for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub base_url: String,
    /// Integration token.
    pub token: String,
    pub version: String,
    pub timeout: Duration,
    pub schema: NotionSchema,
}

impl NotionConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_NOTION_API_URL.to_string(),
            token: token.into(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            schema: NotionSchema::default(),
        }
    }

    /// URL of the create-page endpoint.
    pub fn pages_url(&self) -> String {
        format!("{}/pages", self.base_url.trim_end_matches('/'))
    }
}

/// Column names of the target Notion database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionSchema {
    /// Title column holding the home name.
    pub title: String,
    /// Number column holding the survey score.
    pub score: String,
    /// Rich text column holding the survey comment.
    pub comment: String,
    /// Date column holding the submission date.
    pub date: String,
    /// Rich text column holding the owner name.
    pub owner: String,
    /// Select column holding the home location.
    pub destination: String,
}

impl Default for NotionSchema {
    fn default() -> Self {
        Self {
            title: "Casa".to_string(),
            score: "NPS".to_string(),
            comment: "Comentario".to_string(),
            date: "Fecha".to_string(),
            owner: "Propietarios".to_string(),
            destination: "Destino".to_string(),
        }
    }
}
