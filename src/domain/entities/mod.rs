//! Core domain entities of the import pipeline.
//!
//! - [`LinkRecord`] - One URL and its status state machine
//! - [`ImportSession`] - One pipeline run with its settings snapshot and stats
//! - [`Bookmark`] / [`NewBookmark`] - Bookmarks in the external store
//! - [`NewImportLog`] - Audit record written after a session

pub mod bookmark;
pub mod import_log;
pub mod link_record;
pub mod session;

pub use bookmark::{Bookmark, NewBookmark};
pub use import_log::{LoggedLink, NewImportLog};
pub use link_record::{
    DUPLICATE_NOTE, LinkRecord, LinkStatus, Outcome, SKIPPED_NOTE, StatusChange, TransitionError,
};
pub use session::{
    ConcurrencyLimit, ImportSession, ImportSettings, ImportSource, ImportStats, Priority, Privacy,
    ProcessingMode,
};
