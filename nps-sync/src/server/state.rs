// App state for the Axum server
use std::sync::Arc;

use crate::config::Dependencies;
use crate::listener::ChangeListener;
use crate::migrator::BatchMigrator;

#[derive(Clone)]
pub struct AppState {
    pub migrator: Arc<BatchMigrator>,
    pub listener: Arc<ChangeListener>,
    /// Include error chains in failure responses.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(deps: Dependencies, expose_error_details: bool) -> Self {
        Self {
            migrator: deps.migrator,
            listener: deps.listener,
            expose_error_details,
        }
    }
}
