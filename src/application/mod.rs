//! Application layer services implementing the import pipeline.
//!
//! Services consume the repository traits from [`crate::domain::repositories`]
//! and expose the pipeline to HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::import_service::ImportService`] - Extract, execute and report a session
//! - [`services::batch_executor::BatchExecutor`] - Sequential or batched-parallel dispatch
//! - [`services::duplicate_checker::DuplicateChecker`] - Fail-open existence lookup
//! - [`services::import_reporter::ImportReporter`] - Stats, audit log and summary
//! - [`services::session_registry::SessionRegistry`] - Recent sessions for inspection and retry

pub mod services;
