//! Balance and ledger operations.

use uuid::Uuid;

use storecredit_core::credit::{
    CreditBalance, CreditOperationRequest, CreditOperationResponse, HistoryEntry,
    StoreCreditSummary,
};

use super::StoreCreditClient;
use crate::error::Result;

impl StoreCreditClient {
    /// List every balance with its money value.
    pub async fn list_balances(&self) -> Result<Vec<StoreCreditSummary>> {
        let response = self
            .authorized(self.client.get(self.url("/api/store-credit")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Add credits worth `request.amount`.
    pub async fn add_credit(
        &self,
        request: &CreditOperationRequest,
    ) -> Result<CreditOperationResponse> {
        let response = self
            .authorized(self.client.post(self.url("/api/store-credit/add")))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Deduct credits worth `request.amount`.
    pub async fn deduct_credit(
        &self,
        request: &CreditOperationRequest,
    ) -> Result<CreditOperationResponse> {
        let response = self
            .authorized(self.client.post(self.url("/api/store-credit/deduct")))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get a customer's balance.
    pub async fn get_balance(&self, customer_id: Uuid) -> Result<CreditBalance> {
        let response = self
            .authorized(
                self.client
                    .get(self.url(&format!("/api/store-credit/balance/{}", customer_id))),
            )
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Ledger entries of a balance row, newest first.
    pub async fn history(&self, store_credit_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let response = self
            .authorized(
                self.client
                    .get(self.url(&format!("/api/store-credit/{}/history", store_credit_id))),
            )
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete a balance row and its history.
    pub async fn delete_store_credit(&self, store_credit_id: Uuid) -> Result<()> {
        let response = self
            .authorized(
                self.client
                    .delete(self.url(&format!("/api/store-credit/{}", store_credit_id))),
            )
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}
