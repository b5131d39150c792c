//! Repository trait definitions for the domain layer.
//!
//! The bookmark store and the audit log store are external collaborators.
//! The pipeline only sees them through these traits; concrete clients live in
//! `crate::infrastructure`.
//!
//! - [`BookmarkRepository`] - Create bookmarks and look them up by URL
//! - [`ImportLogRepository`] - Persist session audit records

pub mod bookmark_repository;
pub mod import_log_repository;

pub use bookmark_repository::BookmarkRepository;
pub use import_log_repository::ImportLogRepository;

#[cfg(test)]
pub use bookmark_repository::MockBookmarkRepository;
#[cfg(test)]
pub use import_log_repository::MockImportLogRepository;
