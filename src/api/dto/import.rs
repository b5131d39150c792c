//! DTOs for the import endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::ImportSummary;
use crate::domain::entities::{ImportSession, ImportSettings, ImportSource, ImportStats, LinkRecord};

/// Upper bound on the raw request body handed to the extractor.
pub const MAX_CONTENT_BYTES: u64 = 5 * 1024 * 1024;

/// Request to start an import session.
///
/// ```json
/// {
///   "source": "text",
///   "content": "google.com, https://github.com",
///   "settings": { "processingMode": "parallel", "concurrentLimit": 5 }
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct ImportRequest {
    pub source: ImportSource,

    #[validate(length(min = 1, max = MAX_CONTENT_BYTES, message = "Content must be between 1 byte and 5 MiB"))]
    pub content: String,

    /// Omitted fields take their defaults.
    #[serde(default)]
    pub settings: Option<ImportSettings>,
}

/// Session snapshot returned by every import endpoint.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub session_id: Uuid,
    pub source: ImportSource,
    pub records: Vec<LinkRecord>,
    pub stats: ImportStats,
    pub summary: ImportSummary,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportResponse {
    pub fn new(session: ImportSession, summary: ImportSummary) -> Self {
        Self {
            session_id: session.id,
            source: session.source,
            records: session.records,
            stats: session.stats,
            summary,
            started_at: session.started_at,
            finished_at: session.finished_at,
        }
    }
}

impl From<ImportSession> for ImportResponse {
    /// Rebuilds the summary from the stored stats.
    fn from(session: ImportSession) -> Self {
        let summary = ImportSummary::from_stats(&session.stats);
        Self::new(session, summary)
    }
}
