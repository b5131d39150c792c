//! API route configuration.

use crate::api::handlers::{create_import_handler, get_import_handler, retry_import_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Import session routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /imports`            - Run an import session
/// - `GET  /imports/{id}`       - Fetch a finished session
/// - `POST /imports/{id}/retry` - Retry the failed links of a session
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/imports", post(create_import_handler))
        .route("/imports/{id}", get(get_import_handler))
        .route("/imports/{id}/retry", post(retry_import_handler))
}
