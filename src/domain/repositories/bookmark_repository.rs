//! Repository trait for the external bookmark store.

use crate::domain::entities::{Bookmark, NewBookmark};
use crate::domain::error::ImportError;
use async_trait::async_trait;

/// Access to the bookmark store the pipeline commits into.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpBookmarkRepository`] - REST backend
/// - [`crate::infrastructure::memory::MemoryBookmarkRepository`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Creates a bookmark.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::DuplicateConflict`] (or an application error whose
    /// message mentions a duplicate) when the URL is already stored.
    /// Returns [`ImportError::Transport`] when the store cannot be reached.
    /// Returns [`ImportError::Application`] for any other non-OK answer.
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, ImportError>;

    /// Lists bookmarks matching `url`.
    ///
    /// Stores may match loosely; callers compare `url` fields exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Transport`] or [`ImportError::Application`] on failure.
    async fn find_by_url(&self, url: &str) -> Result<Vec<Bookmark>, ImportError>;

    /// Returns true if the store answers.
    async fn health_check(&self) -> bool;
}
