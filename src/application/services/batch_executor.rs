//! Batch execution controller.
//!
//! Drives every queued record of a session to a terminal state, either one at a
//! time or in fixed-size batches whose members are dispatched concurrently.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc::UnboundedSender;

use crate::application::services::duplicate_checker::DuplicateChecker;
use crate::domain::entities::{
    ImportSession, ImportSettings, LinkRecord, NewBookmark, Outcome, StatusChange,
};
use crate::domain::repositories::BookmarkRepository;

/// Submits queued records to the bookmark store.
///
/// # Scheduling
///
/// - **Sequential**: record *i* reaches its terminal state before record *i+1*
///   starts, so completion order equals input order.
/// - **Parallel**: records are split into batches of `concurrentLimit`. A batch
///   is dispatched at once and fully settles before the next one starts, which
///   bounds in-flight calls to the limit.
///
/// # Failure Isolation
///
/// Each record's outcome is independent. Errors are written to the record and
/// never abort the batch or the session. There is no automatic retry; see
/// [`ImportSession::retry_failed`].
#[derive(Clone)]
pub struct BatchExecutor {
    repository: Arc<dyn BookmarkRepository>,
    duplicate_checker: DuplicateChecker,
}

impl BatchExecutor {
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        let duplicate_checker = DuplicateChecker::new(repository.clone());
        Self {
            repository,
            duplicate_checker,
        }
    }

    /// Processes all queued records of `session`.
    ///
    /// Every transition is sent to `progress` when provided. Returns the
    /// indices of the records dispatched, in session order.
    pub async fn run(
        &self,
        session: &mut ImportSession,
        progress: Option<&UnboundedSender<StatusChange>>,
    ) -> Vec<usize> {
        let queued = session.queued_indices();
        let batch_size = session.settings.batch_size();
        let settings = &session.settings;

        tracing::info!(
            session_id = %session.id,
            queued = queued.len(),
            batch_size,
            "Starting batch execution"
        );

        let mut sent = Vec::with_capacity(queued.len());
        for (batch_index, batch) in queued.chunks(batch_size).enumerate() {
            let mut in_flight = Vec::with_capacity(batch.len());
            for &index in batch {
                let record = &mut session.records[index];
                match record.begin_processing() {
                    Ok(change) => {
                        notify(progress, change);
                        in_flight.push((index, self.new_bookmark(record, settings)));
                    }
                    Err(e) => tracing::error!(record_id = %record.id, error = %e, "Skipping record"),
                }
            }

            let outcomes = join_all(
                in_flight
                    .iter()
                    .map(|(_, new_bookmark)| self.process(new_bookmark.clone(), settings)),
            )
            .await;

            for ((index, _), outcome) in in_flight.iter().zip(outcomes) {
                let record = &mut session.records[*index];
                match record.complete(outcome) {
                    Ok(change) => {
                        tracing::debug!(url = %record.url, status = change.to.as_str(), "Record settled");
                        notify(progress, change);
                    }
                    Err(e) => tracing::error!(record_id = %record.id, error = %e, "Invalid transition"),
                }
            }

            tracing::debug!(batch = batch_index, size = in_flight.len(), "Batch settled");
            sent.extend(in_flight.into_iter().map(|(index, _)| index));
        }

        sent
    }

    /// One per-record work unit: pre-check, create, interpret.
    async fn process(&self, new_bookmark: NewBookmark, settings: &ImportSettings) -> Outcome {
        if settings.pre_check_enabled() && self.duplicate_checker.exists(&new_bookmark.url).await {
            return Outcome::Skipped;
        }

        match self.repository.create(new_bookmark).await {
            Ok(_) => Outcome::Created,
            Err(e) if e.is_duplicate() => Outcome::Duplicate,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    fn new_bookmark(&self, record: &LinkRecord, settings: &ImportSettings) -> NewBookmark {
        NewBookmark {
            url: record.url.clone(),
            title: record.title().to_string(),
            priority: settings.default_priority,
            tags: settings.tags(),
            category: record.category.clone(),
            privacy: settings.default_privacy,
        }
    }
}

fn notify(progress: Option<&UnboundedSender<StatusChange>>, change: StatusChange) {
    if let Some(tx) = progress {
        let _ = tx.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Bookmark, ImportSource, LinkStatus, ProcessingMode, SKIPPED_NOTE,
    };
    use crate::domain::error::ImportError;
    use crate::domain::repositories::MockBookmarkRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn session(urls: &[&str], settings: ImportSettings) -> ImportSession {
        let records = urls
            .iter()
            .map(|u| LinkRecord::queued(u.to_string(), settings.default_category.clone()))
            .collect();
        ImportSession::new(ImportSource::Text, settings, records)
    }

    fn sequential() -> ImportSettings {
        ImportSettings {
            processing_mode: ProcessingMode::Sequential,
            ..ImportSettings::default()
        }
    }

    fn without_pre_check(mut settings: ImportSettings) -> ImportSettings {
        settings.skip_existing = false;
        settings
    }

    /// Store that tracks concurrent calls and the order they finish in.
    #[derive(Default)]
    struct SlowRepository {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        completed: Mutex<Vec<String>>,
        fail_url: Option<String>,
    }

    #[async_trait]
    impl BookmarkRepository for SlowRepository {
        async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, ImportError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.completed
                .lock()
                .unwrap()
                .push(new_bookmark.url.clone());

            if self.fail_url.as_deref() == Some(new_bookmark.url.as_str()) {
                return Err(ImportError::Transport("connection reset".to_string()));
            }
            Ok(Bookmark::new(None, new_bookmark.url, Some(new_bookmark.title)))
        }

        async fn find_by_url(&self, _url: &str) -> Result<Vec<Bookmark>, ImportError> {
            Ok(vec![])
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_parallel_mode_bounds_in_flight_calls() {
        let repo = Arc::new(SlowRepository::default());
        let executor = BatchExecutor::new(repo.clone());
        let urls: Vec<String> = (0..12).map(|i| format!("https://site{i}.com")).collect();
        let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let mut session = session(&url_refs, ImportSettings::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let attempted = executor.run(&mut session, Some(&tx)).await;
        drop(tx);

        assert_eq!(attempted.len(), 12);
        assert_eq!(session.count(LinkStatus::Perfect), 12);
        assert!(repo.peak.load(Ordering::SeqCst) <= 5);

        let mut processing = 0usize;
        let mut peak_processing = 0usize;
        while let Some(change) = rx.recv().await {
            match (change.from, change.to) {
                (LinkStatus::Queued, LinkStatus::Processing) => processing += 1,
                (LinkStatus::Processing, _) => processing -= 1,
                other => panic!("unexpected transition {other:?}"),
            }
            peak_processing = peak_processing.max(processing);
        }
        assert_eq!(processing, 0);
        assert_eq!(peak_processing, 5);
    }

    #[tokio::test]
    async fn test_every_record_passes_through_processing() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_find_by_url().returning(|url| {
            if url == "https://exists.com" {
                Ok(vec![Bookmark::new(None, url.to_string(), None)])
            } else {
                Ok(vec![])
            }
        });
        mock_repo
            .expect_create()
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let mut session = session(&["https://exists.com", "https://new.com"], ImportSettings::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        executor.run(&mut session, Some(&tx)).await;
        drop(tx);

        let mut changes = Vec::new();
        while let Some(change) = rx.recv().await {
            changes.push(change);
        }
        for record in &session.records {
            let seen: Vec<_> = changes
                .iter()
                .filter(|c| c.record_id == record.id)
                .map(|c| (c.from, c.to))
                .collect();
            assert_eq!(seen.len(), 2);
            assert_eq!(seen[0], (LinkStatus::Queued, LinkStatus::Processing));
            assert_eq!(seen[1].0, LinkStatus::Processing);
        }
    }

    #[tokio::test]
    async fn test_pre_check_skips_existing_without_create() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_url()
            .returning(|url| {
                if url == "https://exists.com" {
                    Ok(vec![Bookmark::new(Some("9".to_string()), url.to_string(), None)])
                } else {
                    Ok(vec![])
                }
            });
        mock_repo
            .expect_create()
            .withf(|b| b.url == "https://new.com")
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let mut session = session(&["https://exists.com", "https://new.com"], ImportSettings::default());

        executor.run(&mut session, None).await;

        assert_eq!(session.records[0].status, LinkStatus::Success);
        assert_eq!(session.records[0].error.as_deref(), Some(SKIPPED_NOTE));
        assert_eq!(session.records[1].status, LinkStatus::Perfect);
    }

    #[tokio::test]
    async fn test_pre_check_disabled_unless_both_flags_set() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_find_by_url().times(0);
        mock_repo
            .expect_create()
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let settings = ImportSettings {
            check_duplicates: false,
            ..ImportSettings::default()
        };
        let mut session = session(&["https://a.com"], settings);

        executor.run(&mut session, None).await;

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
    }

    #[tokio::test]
    async fn test_pre_check_failure_fails_open() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_find_by_url()
            .returning(|_| Err(ImportError::application(Some(503), "Service unavailable")));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let mut session = session(&["https://a.com"], ImportSettings::default());

        executor.run(&mut session, None).await;

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
    }

    #[tokio::test]
    async fn test_create_responses_are_interpreted() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_create().returning(|b| match b.url.as_str() {
            "https://conflict.com" => Err(ImportError::DuplicateConflict("exists".to_string())),
            "https://message.com" => Err(ImportError::application(
                Some(400),
                "Bookmark already exists",
            )),
            "https://broken.com" => Err(ImportError::application(Some(500), "Database is down")),
            _ => Ok(Bookmark::new(None, b.url, None)),
        });

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let mut session = session(
            &[
                "https://conflict.com",
                "https://message.com",
                "https://broken.com",
                "https://fine.com",
            ],
            without_pre_check(ImportSettings::default()),
        );

        executor.run(&mut session, None).await;

        assert!(session.records[0].is_duplicate());
        assert!(session.records[1].is_duplicate());
        assert_eq!(session.records[2].status, LinkStatus::Failed);
        assert_eq!(session.records[2].error.as_deref(), Some("Database is down"));
        assert_eq!(session.records[3].status, LinkStatus::Perfect);
    }

    #[tokio::test]
    async fn test_sequential_failure_does_not_block_others() {
        let repo = Arc::new(SlowRepository {
            fail_url: Some("https://two.com".to_string()),
            ..SlowRepository::default()
        });
        let executor = BatchExecutor::new(repo.clone());
        let mut session = session(
            &["https://one.com", "https://two.com", "https://three.com"],
            sequential(),
        );

        executor.run(&mut session, None).await;

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
        assert_eq!(session.records[1].status, LinkStatus::Failed);
        assert_eq!(
            session.records[1].error.as_deref(),
            Some("Network error: connection reset")
        );
        assert_eq!(session.records[2].status, LinkStatus::Perfect);
        assert_eq!(repo.peak.load(Ordering::SeqCst), 1);
        assert_eq!(
            *repo.completed.lock().unwrap(),
            vec!["https://one.com", "https://two.com", "https://three.com"]
        );
    }

    #[tokio::test]
    async fn test_payload_carries_session_defaults() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_create()
            .withf(|b| {
                b.url == "https://www.example.com/a"
                    && b.title == "example.com"
                    && b.tags == vec!["rust".to_string(), "tools".to_string()]
                    && b.category == "Reading"
            })
            .times(1)
            .returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let settings = without_pre_check(ImportSettings {
            auto_apply_tags: "rust,tools".to_string(),
            default_category: "Reading".to_string(),
            ..ImportSettings::default()
        });
        let mut session = session(&["https://www.example.com/a"], settings);

        executor.run(&mut session, None).await;

        assert_eq!(session.records[0].status, LinkStatus::Perfect);
    }

    #[tokio::test]
    async fn test_only_queued_records_are_dispatched() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_create().times(1).returning(|b| Ok(Bookmark::new(None, b.url, None)));

        let executor = BatchExecutor::new(Arc::new(mock_repo));
        let settings = without_pre_check(ImportSettings::default());
        let mut session = session(&["https://a.com"], settings);
        session.records.push(LinkRecord::rejected(
            "https://bad url".to_string(),
            "General",
            "Invalid URL format",
        ));

        let attempted = executor.run(&mut session, None).await;

        assert_eq!(attempted, vec![0]);
        assert_eq!(session.records[1].status, LinkStatus::Failed);
    }
}
