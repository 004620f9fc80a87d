//! Default rate configuration.

use storecredit_core::credit::StoreCreditConfig;

use super::StoreCreditClient;
use crate::error::Result;

impl StoreCreditClient {
    pub async fn get_config(&self) -> Result<StoreCreditConfig> {
        let response = self
            .authorized(self.client.get(self.url("/api/store-credit/config")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Set the global value per credit.
    pub async fn set_default_value_per_credit(&self, value: f64) -> Result<StoreCreditConfig> {
        let response = self
            .authorized(self.client.put(self.url("/api/store-credit/config")))
            .json(&StoreCreditConfig {
                default_value_per_credit: value,
            })
            .send()
            .await?;
        self.handle_response(response).await
    }
}
