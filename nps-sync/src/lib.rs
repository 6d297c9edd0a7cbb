//! # NPS Sync
//!
//! Copies NPS survey answers from Firestore into a Notion database.
//!
//! ## Architecture
//!
//! 1. **Lookup**: finds the home and user a survey refers to
//! 2. **Mapper**: joins a survey with its lookups into an external page
//! 3. **Migrator**: maps every eligible survey in one pass (bulk trigger)
//! 4. **Listener**: maps one newly created survey (per-document trigger)
//! 5. **Server**: exposes both triggers over HTTP
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency wiring
//! - [`lookup`]: Home and user lookups
//! - [`mapper`]: Date normalization and record mapping
//! - [`migrator`]: Bulk migration
//! - [`listener`]: Per-document sync
//! - [`server`]: HTTP routes and handlers
//! - [`errors`]: Error types for the sync steps
//!
//! The binaries call [`init_tracing`] before anything else.

pub mod config;
pub mod errors;
pub mod listener;
pub mod lookup;
pub mod mapper;
pub mod migrator;
pub mod server;
mod telemetry;

pub use config::{Dependencies, SyncConfig};
pub use errors::SyncError;
pub use telemetry::init_tracing;

use thiserror::Error;

/// Errors that can occur during startup or while serving.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sync error.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// The HTTP server failed.
    #[error("Server error: {0}")]
    ServerError(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }
}
