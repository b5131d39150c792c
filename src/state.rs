//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ImportLimits, ImportService, SessionRegistry};
use crate::domain::repositories::{BookmarkRepository, ImportLogRepository};

/// Cheap-to-clone handle over the import pipeline and its collaborators.
#[derive(Clone)]
pub struct AppState {
    pub import_service: Arc<ImportService>,
    pub sessions: Arc<SessionRegistry>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl AppState {
    /// Wires the pipeline over the given stores.
    ///
    /// `session_history` bounds how many finished sessions stay available for
    /// lookup and retry.
    pub fn new(
        bookmarks: Arc<dyn BookmarkRepository>,
        logs: Arc<dyn ImportLogRepository>,
        limits: ImportLimits,
        session_history: usize,
    ) -> Self {
        Self {
            import_service: Arc::new(ImportService::new(bookmarks.clone(), logs, limits)),
            sessions: Arc::new(SessionRegistry::new(session_history)),
            bookmarks,
        }
    }
}
