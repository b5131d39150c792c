//! Duplicate pre-check against the bookmark store.

use std::sync::Arc;

use crate::domain::repositories::BookmarkRepository;

/// Looks up URLs in the store before a creation call is issued.
///
/// Lookup failures are inconclusive: the check fails open and the caller
/// proceeds to create the bookmark.
#[derive(Clone)]
pub struct DuplicateChecker {
    repository: Arc<dyn BookmarkRepository>,
}

impl DuplicateChecker {
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        Self { repository }
    }

    /// Returns true only when the store holds a bookmark with exactly `url`.
    pub async fn exists(&self, url: &str) -> bool {
        match self.repository.find_by_url(url).await {
            Ok(bookmarks) => bookmarks.iter().any(|b| b.url == url),
            Err(e) => {
                tracing::warn!(url, error = %e, "Duplicate pre-check failed, proceeding with create");
                false
            }
        }
    }
}
