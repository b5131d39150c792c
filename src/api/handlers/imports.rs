//! Handlers for import sessions.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::import::{ImportRequest, ImportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Runs a complete import session.
///
/// # Endpoint
///
/// `POST /api/imports`
///
/// Per-link failures do not fail the request; they are reported in
/// `records` and `stats`.
///
/// # Errors
///
/// Returns 400 Bad Request if:
/// - The body fails validation
/// - Text or file content contains no URL
/// - More URLs were found than the configured maximum
pub async fn create_import_handler(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    payload.validate()?;

    let settings = payload.settings.unwrap_or_default();
    let (session, summary) = state
        .import_service
        .import(payload.source, &payload.content, settings, None)
        .await?;

    state.sessions.save(session.clone()).await;

    Ok(Json(ImportResponse::new(session, summary)))
}

/// Returns a finished session.
///
/// # Endpoint
///
/// `GET /api/imports/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the session is unknown or was evicted.
pub async fn get_import_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(ImportResponse::from(session)))
}

/// Re-runs the failed records of a finished session.
///
/// # Endpoint
///
/// `POST /api/imports/{id}/retry`
///
/// # Errors
///
/// - 404 Not Found if the session is unknown
/// - 400 Bad Request if the session has no failed records
pub async fn retry_import_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImportResponse>, AppError> {
    let mut session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let summary = state
        .import_service
        .retry_failed(&mut session, None)
        .await?;

    state.sessions.save(session.clone()).await;

    Ok(Json(ImportResponse::new(session, summary)))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::not_found("Import session not found", json!({ "session_id": id }))
}
