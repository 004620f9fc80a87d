//! Pure mapping of ledger errors to HTTP status codes.

use super::CreditError;
use crate::storage::repository_error_to_status_code;

/// Maps a [`CreditError`] to an HTTP status code.
///
/// - `InvalidAmount` -> 400
/// - `CustomerNotFound`, `StoreCreditNotFound` -> 404
/// - `Contention` -> 409
/// - `NoBalance`, `InsufficientBalance` -> 422
/// - `Repository` -> delegated to [`repository_error_to_status_code`]
pub fn credit_error_to_status_code(error: &CreditError) -> u16 {
    match error {
        CreditError::InvalidAmount(_) => 400,
        CreditError::CustomerNotFound(_) | CreditError::StoreCreditNotFound(_) => 404,
        CreditError::Contention { .. } => 409,
        CreditError::NoBalance(_) | CreditError::InsufficientBalance { .. } => 422,
        CreditError::Repository(err) => repository_error_to_status_code(err),
    }
}
