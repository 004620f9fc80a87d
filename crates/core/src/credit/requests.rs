//! Request and response bodies of the admin ledger API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_optional_string, deserialize_optional_uuid};

use super::types::CreditBalance;

/// Body of `POST /api/store-credit/add` and `POST /api/store-credit/deduct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditOperationRequest {
    pub customer_id: Uuid,
    /// Money amount, converted to credits server-side.
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub order_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub currency_id: Option<Uuid>,
}

/// Successful add/deduct response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditOperationResponse {
    pub success: bool,
    pub history_id: Uuid,
    pub store_credit_id: Uuid,
    pub credits: f64,
    pub balance: CreditBalance,
}

/// Error body shared by all admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Body of `GET`/`PUT /api/store-credit/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreditConfig {
    pub default_value_per_credit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_request_accepts_minimal_body() {
        let body = r#"{"customerId": "550e8400-e29b-41d4-a716-446655440000", "amount": 12.5}"#;
        let request: CreditOperationRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.amount, 12.5);
        assert_eq!(request.reason, None);
        assert_eq!(request.order_id, None);
    }

    #[test]
    fn test_operation_request_treats_blank_fields_as_missing() {
        let body = r#"{
            "customerId": "550e8400-e29b-41d4-a716-446655440000",
            "amount": 1,
            "reason": "",
            "orderId": "",
            "currencyId": null
        }"#;
        let request: CreditOperationRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.reason, None);
        assert_eq!(request.order_id, None);
        assert_eq!(request.currency_id, None);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("no_balance", "nothing")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "no_balance");
        assert_eq!(json["message"], "nothing");
    }
}
