use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Bookmark, NewBookmark};
use crate::domain::error::ImportError;
use crate::domain::repositories::BookmarkRepository;

/// Bookmark store kept in memory. Rejects a second bookmark for the same URL.
#[derive(Default)]
pub struct MemoryBookmarkRepository {
    bookmarks: RwLock<Vec<Bookmark>>,
}

impl MemoryBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds bookmarks for `urls`.
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bookmarks = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| Bookmark::new(Some((i + 1).to_string()), url.into(), None))
            .collect();

        Self {
            bookmarks: RwLock::new(bookmarks),
        }
    }

    pub async fn len(&self) -> usize {
        self.bookmarks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookmarks.read().await.is_empty()
    }
}

#[async_trait]
impl BookmarkRepository for MemoryBookmarkRepository {
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, ImportError> {
        let mut bookmarks = self.bookmarks.write().await;

        if bookmarks.iter().any(|b| b.url == new_bookmark.url) {
            return Err(ImportError::DuplicateConflict(
                "Bookmark already exists".to_string(),
            ));
        }

        let bookmark = Bookmark::new(
            Some((bookmarks.len() + 1).to_string()),
            new_bookmark.url,
            Some(new_bookmark.title),
        );
        bookmarks.push(bookmark.clone());

        Ok(bookmark)
    }

    async fn find_by_url(&self, url: &str) -> Result<Vec<Bookmark>, ImportError> {
        Ok(self
            .bookmarks
            .read()
            .await
            .iter()
            .filter(|b| b.url == url)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
