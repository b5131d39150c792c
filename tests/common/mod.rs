#![allow(dead_code)]

use axum::{Router, routing::get};
use bookmark_import::api::handlers::health_handler;
use bookmark_import::api::routes::import_routes;
use bookmark_import::application::services::ImportLimits;
use bookmark_import::infrastructure::http::{
    BackendClient, HttpBookmarkRepository, HttpImportLogRepository,
};
use bookmark_import::infrastructure::memory::{
    MemoryBookmarkRepository, MemoryImportLogRepository,
};
use bookmark_import::state::AppState;
use std::sync::Arc;
use std::time::Duration;

pub struct MemoryStores {
    pub bookmarks: Arc<MemoryBookmarkRepository>,
    pub logs: Arc<MemoryImportLogRepository>,
}

pub fn test_limits() -> ImportLimits {
    ImportLimits {
        max_links: 50,
        audit_log_attempts: 1,
    }
}

/// State over in-memory stores that already hold `existing` URLs.
pub fn create_test_state(existing: &[&str]) -> (AppState, MemoryStores) {
    let bookmarks = Arc::new(MemoryBookmarkRepository::with_urls(existing.iter().copied()));
    let logs = Arc::new(MemoryImportLogRepository::new());

    let state = AppState::new(bookmarks.clone(), logs.clone(), test_limits(), 10);

    (state, MemoryStores { bookmarks, logs })
}

/// State over the REST repositories pointed at `base_url`.
pub fn create_http_state(base_url: &str) -> AppState {
    let client = BackendClient::new(
        base_url,
        Some("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    AppState::new(
        Arc::new(HttpBookmarkRepository::new(client.clone())),
        Arc::new(HttpImportLogRepository::new(client)),
        test_limits(),
        10,
    )
}

pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", import_routes())
        .with_state(state)
}
