//! REST clients for the bookmark backend.
//!
//! # Endpoints Used
//!
//! - `POST /bookmarks`         - Create a bookmark (`409` on duplicates)
//! - `GET  /bookmarks?url=...` - Look up bookmarks by URL
//! - `POST /import-logs`       - Persist a session audit record
//! - `GET  /health`            - Liveness

mod client;
mod http_bookmark_repository;
mod http_import_log_repository;

pub use client::BackendClient;
pub use http_bookmark_repository::HttpBookmarkRepository;
pub use http_import_log_repository::HttpImportLogRepository;
