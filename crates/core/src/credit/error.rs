use thiserror::Error;
use uuid::Uuid;

use crate::storage::RepositoryError;

/// Errors returned by ledger operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CreditError {
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),
    #[error("No store credit found for customer {0}")]
    NoBalance(Uuid),
    #[error("Insufficient store credit balance: {available} credits available, {requested} requested")]
    InsufficientBalance { available: f64, requested: f64 },
    #[error("Store credit not found: {0}")]
    StoreCreditNotFound(Uuid),
    #[error("Balance update kept conflicting after {attempts} attempts")]
    Contention { attempts: u32 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CreditError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CreditError::InvalidAmount(_) => "invalid_amount",
            CreditError::CustomerNotFound(_) => "customer_not_found",
            CreditError::NoBalance(_) => "no_balance",
            CreditError::InsufficientBalance { .. } => "insufficient_balance",
            CreditError::StoreCreditNotFound(_) => "store_credit_not_found",
            CreditError::Contention { .. } => "contention",
            CreditError::Repository(_) => "storage",
        }
    }
}
