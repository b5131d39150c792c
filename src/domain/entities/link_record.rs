//! Link record entity and its status state machine.

use serde::Serialize;
use uuid::Uuid;

/// Annotation carried by a `success` record rejected by the backend as a duplicate.
pub const DUPLICATE_NOTE: &str = "Duplicate";

/// Annotation carried by a `success` record resolved by the duplicate pre-check.
pub const SKIPPED_NOTE: &str = "Skipped (exists)";

/// Processing status of a single link.
///
/// ```text
/// queued -> processing -> { perfect | success | failed }
/// failed -> queued                 (explicit retry only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Queued,
    Processing,
    /// Imported, but as a benign skip: see the record's `error` annotation.
    Success,
    /// Created unconditionally.
    Perfect,
    Failed,
}

impl LinkStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Perfect | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Perfect => "perfect",
            Self::Failed => "failed",
        }
    }
}

/// Result of one per-record work unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Pre-check found the URL in the store; no creation call was made.
    Skipped,
    /// Creation call reported a conflict.
    Duplicate,
    Failed(String),
}

/// Invalid use of the record state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot move record from {from:?} to {to:?}")]
    Illegal { from: LinkStatus, to: LinkStatus },
    #[error("record failed validation and cannot be retried")]
    Rejected,
}

/// A status transition, emitted to progress observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub record_id: Uuid,
    pub url: String,
    pub from: LinkStatus,
    pub to: LinkStatus,
}

/// One tracked URL inside an import session.
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    pub id: Uuid,
    pub url: String,
    pub domain: String,
    pub category: String,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the record failed local validation and was never dispatched.
    #[serde(skip)]
    pub rejected: bool,
}

impl LinkRecord {
    /// Creates a queued record for an already normalized URL.
    pub fn queued(url: String, category: impl Into<String>) -> Self {
        let domain = display_domain(&url);
        Self {
            id: Uuid::new_v4(),
            url,
            domain,
            category: category.into(),
            status: LinkStatus::Queued,
            error: None,
            rejected: false,
        }
    }

    /// Creates a record that failed validation and is never dispatched.
    pub fn rejected(url: String, category: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut record = Self::queued(url, category);
        record.status = LinkStatus::Failed;
        record.error = Some(reason.into());
        record.rejected = true;
        record
    }

    /// Title sent with the creation call.
    pub fn title(&self) -> &str {
        &self.domain
    }

    /// True for `success` records that mask a duplicate or pre-check skip.
    pub fn is_duplicate(&self) -> bool {
        self.status == LinkStatus::Success && self.error.as_deref() == Some(DUPLICATE_NOTE)
    }

    pub fn is_skipped(&self) -> bool {
        self.status == LinkStatus::Success && self.error.as_deref() == Some(SKIPPED_NOTE)
    }

    /// `queued -> processing`.
    pub fn begin_processing(&mut self) -> Result<StatusChange, TransitionError> {
        self.transition(LinkStatus::Processing, LinkStatus::Queued)
    }

    /// `processing -> perfect | success | failed`, depending on the outcome.
    pub fn complete(&mut self, outcome: Outcome) -> Result<StatusChange, TransitionError> {
        let (to, error) = match outcome {
            Outcome::Created => (LinkStatus::Perfect, None),
            Outcome::Skipped => (LinkStatus::Success, Some(SKIPPED_NOTE.to_string())),
            Outcome::Duplicate => (LinkStatus::Success, Some(DUPLICATE_NOTE.to_string())),
            Outcome::Failed(message) => (LinkStatus::Failed, Some(message)),
        };
        let change = self.transition(to, LinkStatus::Processing)?;
        self.error = error;
        Ok(change)
    }

    /// Perfect, duplicate or skipped.
    pub fn is_imported(&self) -> bool {
        matches!(self.status, LinkStatus::Perfect | LinkStatus::Success)
    }

    /// `failed -> queued`, clearing the error. Used by "Retry Failed" only.
    ///
    /// Records rejected by validation stay `failed`.
    pub fn reset_for_retry(&mut self) -> Result<StatusChange, TransitionError> {
        if self.rejected {
            return Err(TransitionError::Rejected);
        }
        let change = self.transition(LinkStatus::Queued, LinkStatus::Failed)?;
        self.error = None;
        Ok(change)
    }

    fn transition(
        &mut self,
        to: LinkStatus,
        required: LinkStatus,
    ) -> Result<StatusChange, TransitionError> {
        if self.status != required {
            return Err(TransitionError::Illegal {
                from: self.status,
                to,
            });
        }
        let change = StatusChange {
            record_id: self.id,
            url: self.url.clone(),
            from: self.status,
            to,
        };
        self.status = to;
        Ok(change)
    }
}

/// Host name of `url` with a leading `www.` removed.
///
/// Falls back to the raw input when it does not parse.
pub fn display_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").unwrap_or(&host).to_string())
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LinkRecord {
        LinkRecord::queued("https://www.example.com/page".to_string(), "General")
    }

    #[test]
    fn test_queued_record_derives_domain() {
        let record = record();

        assert_eq!(record.status, LinkStatus::Queued);
        assert_eq!(record.domain, "example.com");
        assert_eq!(record.title(), "example.com");
        assert_eq!(record.category, "General");
        assert!(record.error.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = record();
        let b = record();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_happy_path_to_perfect() {
        let mut record = record();

        let change = record.begin_processing().unwrap();
        assert_eq!(change.from, LinkStatus::Queued);
        assert_eq!(change.to, LinkStatus::Processing);

        let change = record.complete(Outcome::Created).unwrap();
        assert_eq!(change.to, LinkStatus::Perfect);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_skip_and_duplicate_annotations() {
        let mut skipped = record();
        skipped.begin_processing().unwrap();
        skipped.complete(Outcome::Skipped).unwrap();
        assert_eq!(skipped.status, LinkStatus::Success);
        assert_eq!(skipped.error.as_deref(), Some("Skipped (exists)"));
        assert!(skipped.is_skipped());
        assert!(!skipped.is_duplicate());

        let mut duplicate = record();
        duplicate.begin_processing().unwrap();
        duplicate.complete(Outcome::Duplicate).unwrap();
        assert!(duplicate.is_duplicate());
    }

    #[test]
    fn test_cannot_complete_without_processing() {
        let mut record = record();

        let result = record.complete(Outcome::Created);

        assert!(matches!(
            result,
            Err(TransitionError::Illegal {
                from: LinkStatus::Queued,
                to: LinkStatus::Perfect
            })
        ));
        assert_eq!(record.status, LinkStatus::Queued);
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut record = record();
        record.begin_processing().unwrap();
        record
            .complete(Outcome::Failed("HTTP 500".to_string()))
            .unwrap();

        record.reset_for_retry().unwrap();
        assert_eq!(record.status, LinkStatus::Queued);
        assert!(record.error.is_none());

        record.begin_processing().unwrap();
        record.complete(Outcome::Created).unwrap();
        assert!(record.reset_for_retry().is_err());
        assert_eq!(record.status, LinkStatus::Perfect);
    }

    #[test]
    fn test_rejected_record_is_failed() {
        let record = LinkRecord::rejected("not a url".to_string(), "General", "Invalid URL format");

        assert_eq!(record.status, LinkStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("Invalid URL format"));
        assert_eq!(record.domain, "not a url");
    }

    #[test]
    fn test_rejected_record_cannot_be_retried() {
        let mut record =
            LinkRecord::rejected("not a url".to_string(), "General", "Invalid URL format");

        assert_eq!(record.reset_for_retry(), Err(TransitionError::Rejected));
        assert_eq!(record.status, LinkStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("Invalid URL format"));
        assert!(!record.is_imported());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(LinkStatus::Perfect).unwrap();
        assert_eq!(json, "perfect");
    }
}
