//! Audit record persisted once per finished session.

use serde::Serialize;

use super::link_record::LinkStatus;
use super::session::{ImportSession, ImportSettings};

/// Per-link entry of the audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedLink {
    pub url: String,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload of the persist-import-log call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImportLog {
    pub total_links: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub duplicate_count: usize,
    pub skipped_count: usize,
    pub settings: ImportSettings,
    pub source: String,
    pub import_method: String,
    pub links_data: Vec<LoggedLink>,
}

impl NewImportLog {
    /// Builds the audit record from a session whose stats are up to date.
    pub fn from_session(session: &ImportSession, source: &str) -> Self {
        let stats = &session.stats;
        Self {
            total_links: stats.total,
            success_count: stats.success,
            failed_count: stats.failed,
            duplicate_count: stats.duplicate,
            skipped_count: stats.skipped,
            settings: session.settings.clone(),
            source: source.to_string(),
            import_method: session.source.import_method().to_string(),
            links_data: session
                .records
                .iter()
                .map(|r| LoggedLink {
                    url: r.url.clone(),
                    status: r.status,
                    error: r.error.clone(),
                })
                .collect(),
        }
    }
}
