//! Bookmark entity as seen through the external bookmark store.

use serde::{Deserialize, Serialize};

use super::session::{Priority, Privacy};

/// A bookmark already persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Bookmark {
    pub fn new(id: Option<String>, url: String, title: Option<String>) -> Self {
        Self { id, url, title }
    }
}

/// Payload of the create-bookmark call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub category: String,
    pub privacy: Privacy,
}
