//! NPS Sync Main Entry Point
//!
//! Serves the bulk migration and the survey-created trigger over HTTP.

use dotenv::dotenv;
use nps_sync::server::{self, state::AppState};
use nps_sync::{AppError, Dependencies, SyncConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    nps_sync::init_tracing();

    info!("Starting NPS sync server");

    let config = SyncConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let deps = match Dependencies::new(&config) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(AppState::new(deps, config.expose_error_details()));

    match server::run_server(app, config.bind_addr).await {
        Ok(()) => {
            info!("NPS sync server stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "NPS sync server failed");
            Err(e)
        }
    }
}
