//! REST implementation of the bookmark repository.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use super::client::{BackendClient, error_message};
use crate::domain::entities::{Bookmark, NewBookmark};
use crate::domain::error::ImportError;
use crate::domain::repositories::BookmarkRepository;

/// Lookup responses come either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookmarkList {
    Plain(Vec<Bookmark>),
    Wrapped { bookmarks: Vec<Bookmark> },
}

impl From<BookmarkList> for Vec<Bookmark> {
    fn from(list: BookmarkList) -> Self {
        match list {
            BookmarkList::Plain(items) | BookmarkList::Wrapped { bookmarks: items } => items,
        }
    }
}

/// Bookmark store reached over HTTP.
pub struct HttpBookmarkRepository {
    client: BackendClient,
}

impl HttpBookmarkRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BookmarkRepository for HttpBookmarkRepository {
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, ImportError> {
        let response = self
            .client
            .request(Method::POST, "/bookmarks")
            .json(&new_bookmark)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // Some backends answer 201 with an empty body.
            let created = response.json::<Bookmark>().await.unwrap_or_else(|_| {
                Bookmark::new(None, new_bookmark.url.clone(), Some(new_bookmark.title.clone()))
            });
            return Ok(created);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        if status == StatusCode::CONFLICT {
            return Err(ImportError::DuplicateConflict(message));
        }
        Err(ImportError::application(Some(status.as_u16()), message))
    }

    async fn find_by_url(&self, url: &str) -> Result<Vec<Bookmark>, ImportError> {
        let response = self
            .client
            .request(Method::GET, "/bookmarks")
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::application(
                Some(status.as_u16()),
                error_message(status, &body),
            ));
        }

        let list = response.json::<BookmarkList>().await?;
        Ok(list.into())
    }

    async fn health_check(&self) -> bool {
        match self.client.request(Method::GET, "/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Bookmark backend health check failed");
                false
            }
        }
    }
}
