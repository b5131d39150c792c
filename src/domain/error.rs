//! Error taxonomy for the import pipeline.
//!
//! Record-level errors never leave the batch executor: they are rendered into
//! [`crate::domain::entities::LinkRecord::error`]. Only session-level problems
//! (bad input, unknown session) reach HTTP handlers as [`crate::AppError`].

/// Errors produced while extracting, creating or reporting links.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// Extraction or normalization could not produce a usable URL.
    #[error("Invalid URL format")]
    InvalidUrl,

    /// The bookmark already exists. Benign, mapped to a duplicate annotation.
    #[error("Duplicate: {0}")]
    DuplicateConflict(String),

    /// The call never produced a response (connect, timeout, decode).
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-OK status and its own message.
    #[error("{message}")]
    Application { status: Option<u16>, message: String },

    /// Writing the session audit record failed.
    #[error("Failed to persist import log: {0}")]
    LogPersistence(String),
}

impl ImportError {
    pub fn application(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Application {
            status,
            message: message.into(),
        }
    }

    /// Returns true when the error signals an already existing bookmark.
    ///
    /// Backends report duplicates either with a `409 Conflict` status or with a
    /// message mentioning "already exists" / "duplicate"; both forms count.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::DuplicateConflict(_) => true,
            Self::Application { status, message } => {
                if *status == Some(409) {
                    return true;
                }
                let lowered = message.to_ascii_lowercase();
                lowered.contains("already exists") || lowered.contains("duplicate")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ImportError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Self::application(Some(status.as_u16()), e.to_string());
        }
        Self::Transport(e.to_string())
    }
}
