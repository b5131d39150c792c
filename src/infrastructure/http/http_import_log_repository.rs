//! REST implementation of the audit log repository.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{BackendClient, error_message};
use crate::domain::entities::NewImportLog;
use crate::domain::error::ImportError;
use crate::domain::repositories::ImportLogRepository;

/// Audit log store reached over HTTP.
pub struct HttpImportLogRepository {
    client: BackendClient,
}

impl HttpImportLogRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImportLogRepository for HttpImportLogRepository {
    async fn save(&self, log: NewImportLog) -> Result<(), ImportError> {
        let response = self
            .client
            .request(Method::POST, "/import-logs")
            .json(&log)
            .send()
            .await
            .map_err(|e| ImportError::LogPersistence(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ImportError::LogPersistence(error_message(status, &body)))
    }
}
