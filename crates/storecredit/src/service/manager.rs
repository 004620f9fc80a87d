//! Store credit ledger operations.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use storecredit_core::credit::{
    credits_to_money, money_to_credits, plan_credit, plan_debit, resolve_value_per_credit,
    validate_amount, ActionType, CreditBalance, CreditError, CreditOperationRequest, Customer,
    CustomerGroup, CustomerRate, HistoryEntry, LedgerReceipt, LedgerRequest, LedgerWrite,
    StoreCredit, StoreCreditSummary, ValuePerCredit, DEFAULT_VALUE_PER_CREDIT_KEY,
};
use storecredit_core::storage::{
    CustomerRepository, HistoryRepository, RepositoryError, SettingsRepository,
    StoreCreditRepository,
};

/// Converts money to credits and keeps balances and their history in step.
///
/// Every balance change goes through [`StoreCreditRepository::commit_ledger`],
/// which applies it only if the balance is still the one that was read. Lost
/// races are retried up to `max_attempts` times.
#[derive(Clone)]
pub struct StoreCreditManager {
    store_credits: Arc<dyn StoreCreditRepository>,
    history: Arc<dyn HistoryRepository>,
    customers: Arc<dyn CustomerRepository>,
    settings: Arc<dyn SettingsRepository>,
    max_attempts: u32,
}

impl StoreCreditManager {
    pub fn new(
        store_credits: Arc<dyn StoreCreditRepository>,
        history: Arc<dyn HistoryRepository>,
        customers: Arc<dyn CustomerRepository>,
        settings: Arc<dyn SettingsRepository>,
        max_attempts: u32,
    ) -> Self {
        Self {
            store_credits,
            history,
            customers,
            settings,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Adds credits worth `amount` to the customer's balance.
    pub async fn add_credit(
        &self,
        request: &CreditOperationRequest,
    ) -> Result<LedgerReceipt, CreditError> {
        self.apply(request, ActionType::Add).await
    }

    /// Deducts credits worth `amount` from the customer's balance.
    ///
    /// Fails with [`CreditError::NoBalance`] or
    /// [`CreditError::InsufficientBalance`] without writing anything.
    pub async fn deduct_credit(
        &self,
        request: &CreditOperationRequest,
    ) -> Result<LedgerReceipt, CreditError> {
        self.apply(request, ActionType::Deduct).await
    }

    async fn apply(
        &self,
        request: &CreditOperationRequest,
        action: ActionType,
    ) -> Result<LedgerReceipt, CreditError> {
        validate_amount(request.amount)?;

        let customer = self.load_customer(request.customer_id).await?;
        let rate = self.effective_rate(&customer).await?;
        let ledger_request = LedgerRequest {
            customer_id: customer.id,
            amount: request.amount,
            credits: money_to_credits(request.amount, rate.value),
            order_id: request.order_id,
            currency_id: request.currency_id,
            reason: request.reason.clone(),
        };

        for attempt in 1..=self.max_attempts {
            let existing = self
                .store_credits
                .get_store_credit_by_customer(customer.id)
                .await?;

            let write = match action {
                ActionType::Add => plan_credit(existing.as_ref(), &ledger_request, Utc::now())?,
                ActionType::Deduct => plan_debit(existing.as_ref(), &ledger_request, Utc::now())?,
            };

            match self.store_credits.commit_ledger(&write).await {
                Ok(()) => {
                    tracing::info!(
                        customer_id = %customer.id,
                        store_credit_id = %write.balance.store_credit_id(),
                        history_id = %write.entry.id,
                        action = %action,
                        amount = request.amount,
                        credits = ledger_request.credits,
                        "Store credit ledger updated"
                    );
                    return Ok(receipt(&write, &ledger_request, rate));
                }
                Err(RepositoryError::Conflict { .. }) => {
                    tracing::debug!(
                        customer_id = %customer.id,
                        attempt,
                        "Store credit balance changed concurrently, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(
            customer_id = %customer.id,
            attempts = self.max_attempts,
            "Giving up on contended store credit balance"
        );
        Err(CreditError::Contention {
            attempts: self.max_attempts,
        })
    }

    /// Current balance of a customer in credits and money.
    ///
    /// Customers without a balance row have a zero balance.
    pub async fn get_credit_balance(&self, customer_id: Uuid) -> Result<CreditBalance, CreditError> {
        let customer = self.load_customer(customer_id).await?;
        let rate = self.effective_rate(&customer).await?;
        let credit = self
            .store_credits
            .get_store_credit_by_customer(customer_id)
            .await?;

        Ok(balance_view(customer_id, credit.as_ref(), rate))
    }

    /// Every balance row with its owner's name and money value.
    pub async fn list_balances(&self) -> Result<Vec<StoreCreditSummary>, CreditError> {
        let credits = self.store_credits.list_store_credits().await?;
        let default_setting = self.settings.get_setting(DEFAULT_VALUE_PER_CREDIT_KEY).await?;
        let mut groups = GroupCache::default();

        let mut summaries = Vec::with_capacity(credits.len());
        for credit in credits {
            let customer = self.customers.get_customer(credit.customer_id).await?;
            let group = match customer.as_ref().and_then(|c| c.group_id) {
                Some(group_id) => groups.get(self.customers.as_ref(), group_id).await?,
                None => None,
            };
            let rate = resolve_value_per_credit(
                customer.as_ref().map(|c| &c.custom_fields),
                group.as_ref().map(|g| &g.custom_fields),
                default_setting.as_ref(),
            );

            summaries.push(StoreCreditSummary {
                id: credit.id,
                customer_id: credit.customer_id,
                customer_full_name: customer.map(|c| c.full_name()).unwrap_or_default(),
                credits: credit.balance,
                balance: credits_to_money(credit.balance, rate.value),
                value_per_credit: rate.value,
                currency_id: credit.currency_id,
                updated_at: credit.updated_at.or(Some(credit.created_at)),
            });
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    /// All customers with their effective value per credit.
    pub async fn list_customers(&self) -> Result<Vec<CustomerRate>, CreditError> {
        let customers = self.customers.list_customers().await?;
        let default_setting = self.settings.get_setting(DEFAULT_VALUE_PER_CREDIT_KEY).await?;
        let mut groups = GroupCache::default();

        let mut rates = Vec::with_capacity(customers.len());
        for customer in customers {
            let group = match customer.group_id {
                Some(group_id) => groups.get(self.customers.as_ref(), group_id).await?,
                None => None,
            };
            let rate = resolve_value_per_credit(
                Some(&customer.custom_fields),
                group.as_ref().map(|g| &g.custom_fields),
                default_setting.as_ref(),
            );
            rates.push(CustomerRate {
                id: customer.id,
                name: customer.full_name(),
                value_per_credit: rate.value,
                rate_source: rate.source,
            });
        }
        Ok(rates)
    }

    /// Ledger entries of a balance row, newest first.
    pub async fn history(&self, store_credit_id: Uuid) -> Result<Vec<HistoryEntry>, CreditError> {
        if self
            .store_credits
            .get_store_credit(store_credit_id)
            .await?
            .is_none()
        {
            return Err(CreditError::StoreCreditNotFound(store_credit_id));
        }
        Ok(self.history.get_history(store_credit_id).await?)
    }

    /// Ledger entries of a customer, newest first. Empty without a balance row.
    pub async fn customer_history(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<HistoryEntry>, CreditError> {
        match self
            .store_credits
            .get_store_credit_by_customer(customer_id)
            .await?
        {
            Some(credit) => Ok(self.history.get_history(credit.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Deletes a balance row and its history.
    pub async fn delete_store_credit(&self, id: Uuid) -> Result<(), CreditError> {
        match self.store_credits.delete_store_credit(id).await {
            Ok(()) => {
                tracing::info!(store_credit_id = %id, "Deleted store credit and its history");
                Ok(())
            }
            Err(RepositoryError::NotFound { .. }) => Err(CreditError::StoreCreditNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// The global value per credit, after fallback.
    pub async fn default_value_per_credit(&self) -> Result<ValuePerCredit, CreditError> {
        let setting = self.settings.get_setting(DEFAULT_VALUE_PER_CREDIT_KEY).await?;
        Ok(resolve_value_per_credit(None, None, setting.as_ref()))
    }

    /// Stores the global value per credit.
    pub async fn set_default_value_per_credit(
        &self,
        value: f64,
    ) -> Result<ValuePerCredit, CreditError> {
        validate_amount(value)?;
        self.settings
            .set_setting(DEFAULT_VALUE_PER_CREDIT_KEY, &serde_json::json!(value))
            .await?;
        tracing::info!(value, "Updated default value per credit");
        self.default_value_per_credit().await
    }

    async fn load_customer(&self, customer_id: Uuid) -> Result<Customer, CreditError> {
        self.customers
            .get_customer(customer_id)
            .await?
            .ok_or(CreditError::CustomerNotFound(customer_id))
    }

    async fn effective_rate(&self, customer: &Customer) -> Result<ValuePerCredit, CreditError> {
        let group = match customer.group_id {
            Some(group_id) => self.customers.get_customer_group(group_id).await?,
            None => None,
        };
        let default_setting = self.settings.get_setting(DEFAULT_VALUE_PER_CREDIT_KEY).await?;

        Ok(resolve_value_per_credit(
            Some(&customer.custom_fields),
            group.as_ref().map(|g| &g.custom_fields),
            default_setting.as_ref(),
        ))
    }
}

/// Memoizes customer group lookups within one listing.
#[derive(Default)]
struct GroupCache(HashMap<Uuid, Option<CustomerGroup>>);

impl GroupCache {
    async fn get(
        &mut self,
        customers: &dyn CustomerRepository,
        id: Uuid,
    ) -> Result<Option<CustomerGroup>, RepositoryError> {
        if let Some(group) = self.0.get(&id) {
            return Ok(group.clone());
        }
        let group = customers.get_customer_group(id).await?;
        self.0.insert(id, group.clone());
        Ok(group)
    }
}

fn balance_view(
    customer_id: Uuid,
    credit: Option<&StoreCredit>,
    rate: ValuePerCredit,
) -> CreditBalance {
    let balance_credits = credit.map(|c| c.balance).unwrap_or(0.0);
    CreditBalance {
        customer_id,
        store_credit_id: credit.map(|c| c.id),
        balance_credits,
        balance_amount: credits_to_money(balance_credits, rate.value),
        balance_currency_id: credit.and_then(|c| c.currency_id),
        value_per_credit: rate.value,
        rate_source: rate.source,
    }
}

fn receipt(write: &LedgerWrite, request: &LedgerRequest, rate: ValuePerCredit) -> LedgerReceipt {
    let balance_credits = write.balance.new_balance();
    LedgerReceipt {
        history_id: write.entry.id,
        store_credit_id: write.balance.store_credit_id(),
        credits: request.credits,
        balance: CreditBalance {
            customer_id: request.customer_id,
            store_credit_id: Some(write.balance.store_credit_id()),
            balance_credits,
            balance_amount: credits_to_money(balance_credits, rate.value),
            balance_currency_id: write.balance.currency_id(),
            value_per_credit: rate.value,
            rate_source: rate.source,
        },
    }
}


#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;

    use crate::storage::SqliteRepository;

    #[tokio::test]
    async fn test_concurrent_adds_never_lose_updates_in_sqlite() {
        let repo = Arc::new(SqliteRepository::new_in_memory().await.unwrap());
        let customer = Customer::new("Ada", "Lovelace");
        repo.upsert_customer(&customer).await.unwrap();
        let id = customer.id;
        let manager =
            StoreCreditManager::new(repo.clone(), repo.clone(), repo.clone(), repo, 50);

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager
                        .add_credit(&CreditOperationRequest {
                            customer_id: id,
                            amount: 1.0,
                            reason: None,
                            order_id: None,
                            currency_id: None,
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let balance = manager.get_credit_balance(id).await.unwrap();
        assert_eq!(balance.balance_credits, 10.0);
        assert_eq!(manager.customer_history(id).await.unwrap().len(), 10);
    }
}
