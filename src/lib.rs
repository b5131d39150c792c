//! # Bookmark Import
//!
//! Bulk link import pipeline for a bookmark manager, served over Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link records, sessions, settings and repository traits
//! - **Application Layer** ([`application`]) - Batch execution, duplicate pre-check, reporting
//! - **Infrastructure Layer** ([`infrastructure`]) - REST and in-memory bookmark stores
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//! - **Utils** ([`utils`]) - URL extraction and normalization
//!
//! ## Pipeline
//!
//! 1. Extract and deduplicate URLs from pasted text, a file or a single URL
//! 2. Materialize one record per URL in the `queued` state
//! 3. Dispatch records in batches (sequential or 3/5/10 at a time)
//! 4. Optionally skip URLs the store already holds
//! 5. Aggregate stats, persist an audit log and build the summary
//!
//! ## Quick Start
//!
//! ```bash
//! # Optional: point at a bookmark backend (in-memory store otherwise)
//! export BOOKMARK_API_URL="https://bookmarks.example.com/api"
//!
//! cargo run
//!
//! curl -X POST localhost:3000/api/imports \
//!   -H 'content-type: application/json' \
//!   -d '{"source":"text","content":"google.com, https://github.com"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ImportLimits, ImportService, ImportSummary, SessionRegistry, SummaryLevel,
    };
    pub use crate::domain::entities::{
        ImportSession, ImportSettings, ImportSource, ImportStats, LinkRecord, LinkStatus,
        StatusChange,
    };
    pub use crate::domain::error::ImportError;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
