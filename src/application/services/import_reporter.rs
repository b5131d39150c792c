//! Session reporting: aggregate stats, audit log and the user-facing summary.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::{ImportSession, ImportStats, NewImportLog};
use crate::domain::error::ImportError;
use crate::domain::repositories::ImportLogRepository;

/// Severity of the end-of-run summary, for the notification layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLevel {
    Success,
    Warning,
    Error,
}

/// End-of-run message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub level: SummaryLevel,
    pub message: String,
}

impl ImportSummary {
    /// Builds the message, omitting every zero-count clause.
    pub fn from_stats(stats: &ImportStats) -> Self {
        let mut clauses = Vec::new();
        if stats.success > 0 {
            clauses.push(format!("{} imported", stats.success));
        }
        if stats.duplicate > 0 {
            clauses.push(plural(stats.duplicate, "duplicate", "duplicates"));
        }
        if stats.skipped > 0 {
            clauses.push(format!("{} skipped", stats.skipped));
        }
        if stats.failed > 0 {
            clauses.push(format!("{} failed", stats.failed));
        }

        let level = match (stats.imported(), stats.failed) {
            (_, 0) => SummaryLevel::Success,
            (0, _) => SummaryLevel::Error,
            _ => SummaryLevel::Warning,
        };

        let message = if clauses.is_empty() {
            "No links were imported".to_string()
        } else {
            format!("Import finished: {}", clauses.join(", "))
        };

        Self { level, message }
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Computes final statistics and persists the session audit record.
#[derive(Clone)]
pub struct ImportReporter {
    repository: Arc<dyn ImportLogRepository>,
    attempts: usize,
}

impl ImportReporter {
    /// Creates a reporter that tries each audit write up to `attempts` times.
    pub fn new(repository: Arc<dyn ImportLogRepository>, attempts: usize) -> Self {
        Self {
            repository,
            attempts: attempts.max(1),
        }
    }

    /// Recomputes `session.stats`, writes the audit record when `logImports`
    /// is on, and returns the summary.
    ///
    /// `dispatched` holds the indices sent to the store in the run being
    /// reported; `source` labels the run in the audit log.
    ///
    /// An audit write failure is logged and never fails the report.
    pub async fn report(
        &self,
        session: &mut ImportSession,
        dispatched: &[usize],
        source: &str,
    ) -> ImportSummary {
        session.stats = ImportStats::tally(&session.records, dispatched);
        session.finished_at = Some(Utc::now());

        let stats = session.stats;
        tracing::info!(
            session_id = %session.id,
            total = stats.total,
            success = stats.success,
            duplicate = stats.duplicate,
            skipped = stats.skipped,
            failed = stats.failed,
            success_rate = stats.success_rate,
            "Import session finished"
        );

        if session.settings.log_imports {
            let log = NewImportLog::from_session(session, source);
            if let Err(e) = self.persist(log).await {
                tracing::warn!(session_id = %session.id, error = %e, "Audit log not saved");
            }
        }

        ImportSummary::from_stats(&stats)
    }

    async fn persist(&self, log: NewImportLog) -> Result<(), ImportError> {
        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(self.attempts - 1);

        Retry::spawn(strategy, || {
            let repository = self.repository.clone();
            let log = log.clone();
            async move { repository.save(log).await }
        })
        .await
    }
}
