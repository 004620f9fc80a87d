//! Health check operations.

use serde::{Deserialize, Serialize};

use super::StoreCreditClient;
use crate::error::Result;

/// Storage health as reported by `/healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub healthy: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl StoreCreditClient {
    /// Liveness check.
    pub async fn livez(&self) -> Result<()> {
        let response = self.client.get(self.url("/livez")).send().await?;
        self.handle_empty_response(response).await
    }

    /// Storage health check.
    pub async fn healthz(&self) -> Result<Health> {
        let response = self.client.get(self.url("/healthz")).send().await?;
        self.handle_response(response).await
    }
}
