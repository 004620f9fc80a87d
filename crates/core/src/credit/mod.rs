mod conversion;
mod error;
mod http_mapping;
mod ledger;
mod requests;
mod types;

pub use conversion::{
    credits_to_money, money_to_credits, parse_rate, resolve_value_per_credit,
    DEFAULT_VALUE_PER_CREDIT_KEY, FALLBACK_VALUE_PER_CREDIT, VALUE_PER_UNIT_FIELD,
};
pub use error::CreditError;
pub use http_mapping::credit_error_to_status_code;
pub use ledger::{
    normalize_reason, plan_credit, plan_debit, validate_amount, BalanceWrite, LedgerRequest,
    LedgerWrite,
};
pub use requests::{
    CreditOperationRequest, CreditOperationResponse, ErrorResponse, StoreCreditConfig,
};
pub use types::{
    ActionType, CreditBalance, Customer, CustomerGroup, CustomerRate, CustomFields, HistoryEntry,
    LedgerReceipt, RateSource, StoreCredit, StoreCreditSummary, ValuePerCredit, DEFAULT_REASON,
};
