//! Domain layer: entities, the record state machine and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Link records, sessions, settings and stats
//! - [`repositories`] - Contracts for the bookmark and audit log stores
//! - [`error`] - Record-level error taxonomy
//!
//! # Pipeline Flow
//!
//! 1. Raw input is turned into URLs by [`crate::utils::url_extractor`]
//! 2. An [`entities::ImportSession`] materializes one record per URL
//! 3. [`crate::application::services::BatchExecutor`] drives queued records to a terminal state
//! 4. [`crate::application::services::ImportReporter`] computes stats and writes the audit log

pub mod entities;
pub mod error;
pub mod repositories;
