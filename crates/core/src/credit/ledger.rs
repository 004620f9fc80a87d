//! Pure ledger planning.
//!
//! These functions decide what a credit or debit writes, given the balance
//! row as last read. The resulting [`LedgerWrite`] is committed atomically by
//! a repository; an update only applies if the stored balance still equals
//! `expected_balance`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::CreditError;
use super::types::{ActionType, HistoryEntry, StoreCredit, DEFAULT_REASON};

/// Change to the balance row that accompanies a history entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceWrite {
    /// First credit for the customer: insert a new row.
    Create(StoreCredit),
    /// Compare-and-swap update of an existing row.
    Update {
        id: Uuid,
        expected_balance: f64,
        new_balance: f64,
        currency_id: Option<Uuid>,
        updated_at: DateTime<Utc>,
    },
}

impl BalanceWrite {
    pub fn store_credit_id(&self) -> Uuid {
        match self {
            BalanceWrite::Create(credit) => credit.id,
            BalanceWrite::Update { id, .. } => *id,
        }
    }

    pub fn new_balance(&self) -> f64 {
        match self {
            BalanceWrite::Create(credit) => credit.balance,
            BalanceWrite::Update { new_balance, .. } => *new_balance,
        }
    }

    pub fn currency_id(&self) -> Option<Uuid> {
        match self {
            BalanceWrite::Create(credit) => credit.currency_id,
            BalanceWrite::Update { currency_id, .. } => *currency_id,
        }
    }
}

/// A balance change plus its ledger entry, committed together.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerWrite {
    pub balance: BalanceWrite,
    pub entry: HistoryEntry,
}

/// Input shared by credit and debit planning.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRequest {
    pub customer_id: Uuid,
    /// Money amount of the transaction.
    pub amount: f64,
    /// Credit delta derived from `amount` at the effective rate.
    pub credits: f64,
    pub order_id: Option<Uuid>,
    pub currency_id: Option<Uuid>,
    pub reason: Option<String>,
}

/// Validates that a money amount can be booked.
pub fn validate_amount(amount: f64) -> Result<(), CreditError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CreditError::InvalidAmount(amount))
    }
}

/// Normalizes an optional reason, replacing missing or blank text.
pub fn normalize_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => DEFAULT_REASON.to_string(),
    }
}

/// Rejects a write whose credit delta or resulting balance is not finite.
fn ensure_finite(request: &LedgerRequest, balance: &BalanceWrite) -> Result<(), CreditError> {
    if request.credits.is_finite() && balance.new_balance().is_finite() {
        Ok(())
    } else {
        Err(CreditError::InvalidAmount(request.amount))
    }
}

fn history_entry(
    store_credit_id: Uuid,
    request: &LedgerRequest,
    action_type: ActionType,
    now: DateTime<Utc>,
) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4(),
        store_credit_id,
        order_id: request.order_id,
        amount: request.amount,
        currency_id: request.currency_id,
        reason: normalize_reason(request.reason.as_deref()),
        action_type,
        created_at: now,
    }
}

/// Plans adding credits, creating the balance row when none exists.
pub fn plan_credit(
    existing: Option<&StoreCredit>,
    request: &LedgerRequest,
    now: DateTime<Utc>,
) -> Result<LedgerWrite, CreditError> {
    validate_amount(request.amount)?;

    let balance = match existing {
        Some(credit) => BalanceWrite::Update {
            id: credit.id,
            expected_balance: credit.balance,
            new_balance: credit.balance + request.credits,
            currency_id: request.currency_id.or(credit.currency_id),
            updated_at: now,
        },
        None => BalanceWrite::Create(StoreCredit {
            id: Uuid::new_v4(),
            customer_id: request.customer_id,
            balance: request.credits,
            currency_id: request.currency_id,
            created_at: now,
            updated_at: None,
        }),
    };
    ensure_finite(request, &balance)?;

    let entry = history_entry(balance.store_credit_id(), request, ActionType::Add, now);
    Ok(LedgerWrite { balance, entry })
}

/// Plans deducting credits.
///
/// Fails without producing a write when the customer has no balance row or
/// the balance is smaller than the requested credits, so a rejected debit
/// never touches the balance or the history.
pub fn plan_debit(
    existing: Option<&StoreCredit>,
    request: &LedgerRequest,
    now: DateTime<Utc>,
) -> Result<LedgerWrite, CreditError> {
    validate_amount(request.amount)?;
    if !request.credits.is_finite() {
        return Err(CreditError::InvalidAmount(request.amount));
    }

    let credit = existing.ok_or(CreditError::NoBalance(request.customer_id))?;
    if credit.balance < request.credits {
        return Err(CreditError::InsufficientBalance {
            available: credit.balance,
            requested: request.credits,
        });
    }

    let balance = BalanceWrite::Update {
        id: credit.id,
        expected_balance: credit.balance,
        new_balance: credit.balance - request.credits,
        currency_id: request.currency_id.or(credit.currency_id),
        updated_at: now,
    };

    let entry = history_entry(credit.id, request, ActionType::Deduct, now);
    Ok(LedgerWrite { balance, entry })
}
