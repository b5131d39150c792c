//! HTTP server initialization and runtime setup.
//!
//! Selects the bookmark backend, wires the import pipeline and runs the Axum
//! server until Ctrl+C.

use crate::application::services::ImportLimits;
use crate::config::Config;
use crate::domain::repositories::{BookmarkRepository, ImportLogRepository};
use crate::infrastructure::http::{BackendClient, HttpBookmarkRepository, HttpImportLogRepository};
use crate::infrastructure::memory::{MemoryBookmarkRepository, MemoryImportLogRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the application state for `config`.
///
/// Uses the REST backend when `BOOKMARK_API_URL` is set and in-memory stores
/// otherwise.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn build_state(config: &Config) -> Result<AppState> {
    let (bookmarks, logs): (Arc<dyn BookmarkRepository>, Arc<dyn ImportLogRepository>) =
        match &config.bookmark_api_url {
            Some(api_url) => {
                let client = BackendClient::new(
                    api_url,
                    config.bookmark_api_token.clone(),
                    config.request_timeout(),
                )
                .context("Failed to build bookmark backend client")?;
                tracing::info!(base_url = client.base_url(), "Bookmark backend enabled (HTTP)");
                let bookmarks: Arc<dyn BookmarkRepository> =
                    Arc::new(HttpBookmarkRepository::new(client.clone()));
                let logs: Arc<dyn ImportLogRepository> =
                    Arc::new(HttpImportLogRepository::new(client));
                (bookmarks, logs)
            }
            None => {
                tracing::info!("Bookmark backend disabled (in-memory store)");
                let bookmarks: Arc<dyn BookmarkRepository> = Arc::new(MemoryBookmarkRepository::new());
                let logs: Arc<dyn ImportLogRepository> = Arc::new(MemoryImportLogRepository::new());
                (bookmarks, logs)
            }
        };

    let limits = ImportLimits {
        max_links: config.max_links_per_import,
        audit_log_attempts: config.audit_log_attempts,
    };

    Ok(AppState::new(bookmarks, logs, limits, config.session_history))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The backend client cannot be built
/// - The listen address is invalid or bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;

    if !state.bookmarks.health_check().await {
        tracing::warn!("Bookmark backend is not answering; imports will fail until it is");
    }

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
