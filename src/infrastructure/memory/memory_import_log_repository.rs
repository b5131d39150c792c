use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::NewImportLog;
use crate::domain::error::ImportError;
use crate::domain::repositories::ImportLogRepository;

/// Audit log store kept in memory.
#[derive(Default)]
pub struct MemoryImportLogRepository {
    logs: RwLock<Vec<NewImportLog>>,
}

impl MemoryImportLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record saved so far, oldest first.
    pub async fn logs(&self) -> Vec<NewImportLog> {
        self.logs.read().await.clone()
    }
}

#[async_trait]
impl ImportLogRepository for MemoryImportLogRepository {
    async fn save(&self, log: NewImportLog) -> Result<(), ImportError> {
        tracing::debug!(
            total = log.total_links,
            failed = log.failed_count,
            source = %log.source,
            "Import log stored in memory"
        );
        self.logs.write().await.push(log);
        Ok(())
    }
}
