// HTTP request handlers
use std::error::Error as StdError;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use nps_sync_repository::firestore::document_from_json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::listener::ListenerOutcome;
use crate::server::state::AppState;

/// Body delivered for a created survey: the Firestore document, if any.
///
/// Eventarc delivers Firestore `DocumentEventData` in JSON mode, where the
/// created document is `value` (`oldValue` and `updateMask` are ignored).
/// `document` is accepted for direct calls.
#[derive(Debug, Deserialize)]
pub struct SurveyCreatedEvent {
    #[serde(default, alias = "value")]
    pub document: Option<Value>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "nps-sync is running")
}

/// Bulk migration endpoint - migrates every eligible survey
pub async fn migrate_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.migrator.run().await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "summary": summary,
            })),
        ),
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Migration failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &e, state.expose_error_details)
        }
    }
}

/// Survey created endpoint - syncs one newly created survey
pub async fn survey_created_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    if body.iter().all(u8::is_ascii_whitespace) {
        info!("No data associated with the event");
        return StatusCode::NO_CONTENT.into_response();
    }

    let event: SurveyCreatedEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Failed to decode survey created event");
            return failure(StatusCode::BAD_REQUEST, &e, false).into_response();
        }
    };

    let document = match event.document.as_ref().map(document_from_json).transpose() {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "Failed to decode survey document");
            return failure(StatusCode::BAD_REQUEST, &e, false).into_response();
        }
    };

    match state.listener.handle(document.as_ref()).await {
        Ok(ListenerOutcome::Created { survey_id, page }) => {
            info!(doc_id = %survey_id, page_id = %page.id, "Synced new survey");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(ListenerOutcome::Skipped(reason)) => {
            info!(reason = ?reason, "Skipped survey created event");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Failed to sync new survey");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &e, state.expose_error_details)
                .into_response()
        }
    }
}

/// `{success: false, error}` body, with the error's source chain as `stack`
/// when details may be exposed.
fn failure(
    status: StatusCode,
    err: &(dyn StdError + 'static),
    expose_details: bool,
) -> (StatusCode, Json<Value>) {
    let mut body = json!({
        "success": false,
        "error": err.to_string(),
    });

    if expose_details {
        let mut stack = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push(cause.to_string());
            source = cause.source();
        }
        body["stack"] = json!(stack);
    }

    (status, Json(body))
}
