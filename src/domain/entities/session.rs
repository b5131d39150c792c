//! Import session, its settings snapshot and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::link_record::{LinkRecord, LinkStatus};

/// Where the raw input of a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    /// Pasted free text.
    Text,
    /// A single explicitly entered URL.
    Url,
    /// Delimited (CSV-like) file content.
    File,
}

impl ImportSource {
    /// Import method label stored in the audit log.
    pub fn import_method(self) -> &'static str {
        match self {
            Self::Text => "paste",
            Self::Url => "single",
            Self::File => "csv",
        }
    }
}

/// Sequential or batched-parallel execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Sequential,
    #[default]
    Parallel,
}

/// Allowed batch sizes for parallel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ConcurrencyLimit(usize);

impl ConcurrencyLimit {
    pub const ALLOWED: [usize; 3] = [3, 5, 10];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("concurrentLimit must be one of 3, 5 or 10, got {value}"))
        }
    }
}

impl From<ConcurrencyLimit> for usize {
    fn from(limit: ConcurrencyLimit) -> Self {
        limit.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Public,
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "General".to_string()
}

/// Configuration snapshot captured when a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    #[serde(default = "default_true")]
    pub validate_urls: bool,
    #[serde(default = "default_true")]
    pub check_duplicates: bool,
    #[serde(default = "default_true")]
    pub skip_existing: bool,
    #[serde(default)]
    pub processing_mode: ProcessingMode,
    #[serde(default)]
    pub concurrent_limit: ConcurrencyLimit,
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default)]
    pub default_privacy: Privacy,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub auto_apply_tags: String,
    #[serde(default = "default_true")]
    pub log_imports: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            validate_urls: true,
            check_duplicates: true,
            skip_existing: true,
            processing_mode: ProcessingMode::default(),
            concurrent_limit: ConcurrencyLimit::default(),
            default_priority: Priority::default(),
            default_privacy: Privacy::default(),
            default_category: default_category(),
            auto_apply_tags: String::new(),
            log_imports: true,
        }
    }
}

impl ImportSettings {
    /// Pre-check runs only when both duplicate options are on.
    pub fn pre_check_enabled(&self) -> bool {
        self.skip_existing && self.check_duplicates
    }

    /// Number of records dispatched together.
    pub fn batch_size(&self) -> usize {
        match self.processing_mode {
            ProcessingMode::Sequential => 1,
            ProcessingMode::Parallel => self.concurrent_limit.get(),
        }
    }

    /// `autoApplyTags` split on commas, trimmed, empties dropped.
    pub fn tags(&self) -> Vec<String> {
        self.auto_apply_tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Aggregate counts over a session's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub total: usize,
    /// Unconditionally created (`perfect`).
    pub success: usize,
    pub duplicate: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Records dispatched during the last run.
    pub attempted: usize,
    pub success_rate: u32,
}

impl ImportStats {
    /// Counts outcomes over `records`.
    ///
    /// `dispatched` holds the indices sent to the store during the run being
    /// reported; the success rate is computed over those records only.
    pub fn tally(records: &[LinkRecord], dispatched: &[usize]) -> Self {
        let mut stats = Self {
            total: records.len(),
            attempted: dispatched.len(),
            ..Self::default()
        };

        for record in records {
            match record.status {
                LinkStatus::Perfect => stats.success += 1,
                LinkStatus::Failed => stats.failed += 1,
                LinkStatus::Success if record.is_skipped() => stats.skipped += 1,
                LinkStatus::Success => stats.duplicate += 1,
                LinkStatus::Queued | LinkStatus::Processing => {}
            }
        }

        let imported_this_run = dispatched
            .iter()
            .filter(|&&i| records.get(i).is_some_and(LinkRecord::is_imported))
            .count();
        stats.success_rate = success_rate(imported_this_run, stats.attempted);
        stats
    }

    /// Records that ended in an imported state, skips included.
    pub fn imported(&self) -> usize {
        self.success + self.duplicate + self.skipped
    }
}

fn success_rate(imported: usize, attempted: usize) -> u32 {
    if attempted == 0 {
        return 0;
    }
    let rate = (imported as f64 / attempted as f64) * 100.0;
    rate.round() as u32
}

/// One run of the import pipeline, owned and passed through every stage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub id: Uuid,
    pub source: ImportSource,
    pub settings: ImportSettings,
    pub records: Vec<LinkRecord>,
    pub stats: ImportStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportSession {
    pub fn new(source: ImportSource, settings: ImportSettings, records: Vec<LinkRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            settings,
            records,
            stats: ImportStats::default(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Indices of records waiting to be dispatched, in session order.
    pub fn queued_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == LinkStatus::Queued)
            .map(|(i, _)| i)
            .collect()
    }

    /// Resets every failed record to queued. Returns how many were reset.
    ///
    /// Successful and duplicate records are left untouched, and so are
    /// records rejected by validation.
    pub fn retry_failed(&mut self) -> usize {
        self.records
            .iter_mut()
            .filter(|r| r.status == LinkStatus::Failed)
            .filter_map(|r| r.reset_for_retry().ok())
            .count()
    }

    pub fn count(&self, status: LinkStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}
