//! Import pipeline orchestration.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;

use crate::application::services::batch_executor::BatchExecutor;
use crate::application::services::import_reporter::{ImportReporter, ImportSummary};
use crate::domain::entities::{
    ImportSession, ImportSettings, ImportSource, LinkRecord, StatusChange,
};
use crate::domain::error::ImportError;
use crate::domain::repositories::{BookmarkRepository, ImportLogRepository};
use crate::error::AppError;
use crate::utils::url_extractor::{
    extract_from_delimited, extract_from_free_text, parse_single, validate,
};

/// Audit log label for a first run.
pub const IMPORT_RUN: &str = "import";
/// Audit log label for a "Retry Failed" run.
pub const RETRY_RUN: &str = "retry";

/// Limits applied to every session.
#[derive(Debug, Clone, Copy)]
pub struct ImportLimits {
    /// Upper bound on extracted URLs per session.
    pub max_links: usize,
    /// Attempts for each audit log write.
    pub audit_log_attempts: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_links: 1000,
            audit_log_attempts: 3,
        }
    }
}

/// Runs the pipeline: extract, materialize, execute, report.
pub struct ImportService {
    executor: BatchExecutor,
    reporter: ImportReporter,
    limits: ImportLimits,
}

impl ImportService {
    /// Creates a new import service.
    pub fn new(
        bookmarks: Arc<dyn BookmarkRepository>,
        logs: Arc<dyn ImportLogRepository>,
        limits: ImportLimits,
    ) -> Self {
        Self {
            executor: BatchExecutor::new(bookmarks),
            reporter: ImportReporter::new(logs, limits.audit_log_attempts),
            limits,
        }
    }

    /// Extracts URLs from `content` and materializes one record per URL.
    ///
    /// A single-URL submission that is not a valid URL still yields a session
    /// with one `failed` record, so the caller sees why nothing was imported.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - Text or file input contains no URL
    /// - More URLs than the configured maximum were extracted
    pub fn prepare(
        &self,
        source: ImportSource,
        content: &str,
        settings: ImportSettings,
    ) -> Result<ImportSession, AppError> {
        let category = settings.default_category.clone();

        let records = match source {
            ImportSource::Url => vec![match parse_single(content) {
                Ok(url) => LinkRecord::queued(url, category),
                Err(e) => LinkRecord::rejected(content.trim().to_string(), category, e.to_string()),
            }],
            ImportSource::Text | ImportSource::File => {
                let urls = if source == ImportSource::Text {
                    extract_from_free_text(content)
                } else {
                    extract_from_delimited(content)
                };

                if urls.is_empty() {
                    return Err(AppError::bad_request("No valid URLs found", json!({})));
                }
                if urls.len() > self.limits.max_links {
                    return Err(AppError::bad_request(
                        "Too many URLs in one import",
                        json!({ "found": urls.len(), "max": self.limits.max_links }),
                    ));
                }

                urls.into_iter()
                    .map(|url| self.materialize(url, &settings))
                    .collect()
            }
        };

        Ok(ImportSession::new(source, settings, records))
    }

    /// Executes and reports a prepared session.
    pub async fn run(
        &self,
        session: &mut ImportSession,
        progress: Option<&UnboundedSender<StatusChange>>,
    ) -> ImportSummary {
        self.execute(session, progress, IMPORT_RUN).await
    }

    /// Prepares and runs a session in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`].
    pub async fn import(
        &self,
        source: ImportSource,
        content: &str,
        settings: ImportSettings,
        progress: Option<&UnboundedSender<StatusChange>>,
    ) -> Result<(ImportSession, ImportSummary), AppError> {
        let mut session = self.prepare(source, content, settings)?;
        tracing::info!(
            session_id = %session.id,
            source = source.import_method(),
            records = session.records.len(),
            "Import session created"
        );
        let summary = self.run(&mut session, progress).await;
        Ok((session, summary))
    }

    /// Resets failed records to queued and runs them again with the session's
    /// original settings. Extraction and deduplication are not repeated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the session has no failed records.
    pub async fn retry_failed(
        &self,
        session: &mut ImportSession,
        progress: Option<&UnboundedSender<StatusChange>>,
    ) -> Result<ImportSummary, AppError> {
        let reset = session.retry_failed();
        if reset == 0 {
            return Err(AppError::bad_request(
                "No failed links to retry",
                json!({ "session_id": session.id }),
            ));
        }

        tracing::info!(session_id = %session.id, reset, "Retrying failed links");
        Ok(self.execute(session, progress, RETRY_RUN).await)
    }

    async fn execute(
        &self,
        session: &mut ImportSession,
        progress: Option<&UnboundedSender<StatusChange>>,
        run: &str,
    ) -> ImportSummary {
        let dispatched = self.executor.run(session, progress).await;
        self.reporter.report(session, &dispatched, run).await
    }

    fn materialize(&self, url: String, settings: &ImportSettings) -> LinkRecord {
        let category = settings.default_category.clone();
        if settings.validate_urls && validate(&url).is_err() {
            return LinkRecord::rejected(url, category, ImportError::InvalidUrl.to_string());
        }
        LinkRecord::queued(url, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Bookmark, LinkStatus, ProcessingMode, SKIPPED_NOTE};
    use crate::domain::repositories::{MockBookmarkRepository, MockImportLogRepository};

    fn quiet_logs() -> Arc<MockImportLogRepository> {
        let mut logs = MockImportLogRepository::new();
        logs.expect_save().returning(|_| Ok(()));
        Arc::new(logs)
    }

    fn service(bookmarks: MockBookmarkRepository) -> ImportService {
        ImportService::new(Arc::new(bookmarks), quiet_logs(), ImportLimits::default())
    }

    #[test]
    fn test_prepare_text_dedupes_in_order() {
        let service = service(MockBookmarkRepository::new());

        let session = service
            .prepare(
                ImportSource::Text,
                "google.com, https://github.com, google.com",
                ImportSettings::default(),
            )
            .unwrap();

        let urls: Vec<_> = session.records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://google.com", "https://github.com"]);
        assert!(session.records.iter().all(|r| r.status == LinkStatus::Queued));
    }

    #[test]
    fn test_prepare_applies_default_category() {
        let service = service(MockBookmarkRepository::new());
        let settings = ImportSettings {
            default_category: "Reading".to_string(),
            ..ImportSettings::default()
        };

        let session = service
            .prepare(ImportSource::File, "url\nhttps://a.com\n", settings)
            .unwrap();

        assert_eq!(session.records[0].category, "Reading");
    }

    #[test]
    fn test_prepare_rejects_empty_extraction() {
        let service = service(MockBookmarkRepository::new());

        let result = service.prepare(ImportSource::Text, "no links here", ImportSettings::default());

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_prepare_enforces_max_links() {
        let service = ImportService::new(
            Arc::new(MockBookmarkRepository::new()),
            quiet_logs(),
            ImportLimits {
                max_links: 2,
                audit_log_attempts: 1,
            },
        );

        let result = service.prepare(
            ImportSource::Text,
            "a.com b.com c.com",
            ImportSettings::default(),
        );

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_prepare_marks_unparseable_urls_when_validating() {
        let service = service(MockBookmarkRepository::new());

        let session = service
            .prepare(
                ImportSource::Text,
                "good.com https://exa_mple.com:99999",
                ImportSettings::default(),
            )
            .unwrap();

        assert_eq!(session.records.len(), 2);
        assert_eq!(session.records[0].status, LinkStatus::Queued);
        assert_eq!(session.records[1].status, LinkStatus::Failed);
        assert_eq!(session.records[1].error.as_deref(), Some("Invalid URL format"));
    }

    #[tokio::test]
    async fn test_single_invalid_url_fails_without_network() {
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks.expect_find_by_url().times(0);
        bookmarks.expect_create().times(0);
        let service = service(bookmarks);

        let (session, summary) = service
            .import(ImportSource::Url, "not a url", ImportSettings::default(), None)
            .await
            .unwrap();

        assert_eq!(session.records.len(), 1);
        assert_eq!(session.records[0].status, LinkStatus::Failed);
        assert_eq!(session.records[0].error.as_deref(), Some("Invalid URL format"));
        assert_eq!(session.stats.failed, 1);
        assert_eq!(session.stats.attempted, 0);
        assert_eq!(summary.message, "Import finished: 1 failed");
    }

    #[tokio::test]
    async fn test_pre_check_scenario() {
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks.expect_find_by_url().returning(|url| {
            if url == "https://github.com" {
                Ok(vec![Bookmark::new(Some("7".to_string()), url.to_string(), None)])
            } else {
                Ok(vec![])
            }
        });
        bookmarks
            .expect_create()
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));
        let service = service(bookmarks);

        let (session, _) = service
            .import(
                ImportSource::Text,
                "google.com https://github.com",
                ImportSettings::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
        assert_eq!(session.records[1].status, LinkStatus::Success);
        assert_eq!(session.records[1].error.as_deref(), Some(SKIPPED_NOTE));
        assert_eq!(session.stats.total, 2);
        assert_eq!(session.stats.success, 1);
        assert_eq!(session.stats.skipped, 1);
        assert_eq!(session.stats.failed, 0);
    }

    #[tokio::test]
    async fn test_retry_failed_reruns_only_failures() {
        let mut bookmarks = MockBookmarkRepository::new();
        let mut calls = 0;
        bookmarks.expect_create().returning(move |b| {
            calls += 1;
            if b.url == "https://flaky.com" && calls <= 2 {
                Err(ImportError::Transport("timed out".to_string()))
            } else {
                Ok(Bookmark::new(None, b.url, None))
            }
        });
        let service = service(bookmarks);
        let settings = ImportSettings {
            processing_mode: ProcessingMode::Sequential,
            skip_existing: false,
            ..ImportSettings::default()
        };

        let (mut session, _) = service
            .import(ImportSource::Text, "ok.com flaky.com", settings, None)
            .await
            .unwrap();
        assert_eq!(session.stats.failed, 1);

        let summary = service.retry_failed(&mut session, None).await.unwrap();

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
        assert_eq!(session.records[1].status, LinkStatus::Perfect);
        assert_eq!(session.stats.attempted, 1);
        assert_eq!(session.stats.success, 2);
        assert_eq!(summary.message, "Import finished: 2 imported");
    }

    #[tokio::test]
    async fn test_retry_that_fails_again_reports_zero_rate() {
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks.expect_create().returning(|b| {
            if b.url == "https://bad.com" {
                Err(ImportError::application(Some(500), "HTTP 500"))
            } else {
                Ok(Bookmark::new(None, b.url, None))
            }
        });
        let service = service(bookmarks);
        let settings = ImportSettings {
            processing_mode: ProcessingMode::Sequential,
            skip_existing: false,
            ..ImportSettings::default()
        };

        let (mut session, _) = service
            .import(ImportSource::Text, "a.com b.com c.com bad.com", settings, None)
            .await
            .unwrap();
        assert_eq!(session.stats.attempted, 4);
        assert_eq!(session.stats.success_rate, 75);

        service.retry_failed(&mut session, None).await.unwrap();

        assert_eq!(session.records[3].status, LinkStatus::Failed);
        assert_eq!(session.stats.attempted, 1);
        assert_eq!(session.stats.failed, 1);
        assert_eq!(session.stats.success, 3);
        assert_eq!(session.stats.success_rate, 0);
    }

    #[tokio::test]
    async fn test_retry_never_dispatches_invalid_input() {
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks.expect_find_by_url().times(0);
        bookmarks.expect_create().times(0);
        let service = service(bookmarks);

        let (mut session, _) = service
            .import(ImportSource::Url, "not a url", ImportSettings::default(), None)
            .await
            .unwrap();

        let result = service.retry_failed(&mut session, None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(session.records[0].status, LinkStatus::Failed);
        assert_eq!(session.records[0].error.as_deref(), Some("Invalid URL format"));
    }

    #[tokio::test]
    async fn test_retry_without_failures_is_rejected() {
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks
            .expect_find_by_url()
            .returning(|_| Ok(vec![]));
        bookmarks
            .expect_create()
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));
        let service = service(bookmarks);

        let (mut session, _) = service
            .import(ImportSource::Text, "ok.com", ImportSettings::default(), None)
            .await
            .unwrap();

        let result = service.retry_failed(&mut session, None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
