//! Repository trait for session audit records.

use crate::domain::entities::NewImportLog;
use crate::domain::error::ImportError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportLogRepository: Send + Sync {
    /// Persists one audit record.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::LogPersistence`] when the write fails.
    async fn save(&self, log: NewImportLog) -> Result<(), ImportError>;
}
