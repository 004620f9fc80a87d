use storecredit_core::credit::CustomerRate;

use super::StoreCreditClient;
use crate::error::Result;

impl StoreCreditClient {
    /// List customers with their effective value per credit.
    pub async fn list_customers(&self) -> Result<Vec<CustomerRate>> {
        let response = self
            .authorized(self.client.get(self.url("/api/store-credit/customers")))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
