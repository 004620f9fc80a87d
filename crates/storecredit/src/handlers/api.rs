//! Admin store credit API.
//!
//! Every handler takes the [`AdminToken`] guard. Money values and rates are
//! computed here, server-side, so clients only display them.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use storecredit_core::credit::{
    CreditOperationRequest, CreditOperationResponse, LedgerReceipt, StoreCreditConfig,
};

use crate::{
    extractors::AdminToken,
    handlers::error::{AppError, InvalidBody},
    state::AppState,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| InvalidBody(rejection.body_text()).into())
}

fn operation_response(receipt: LedgerReceipt) -> CreditOperationResponse {
    CreditOperationResponse {
        success: true,
        history_id: receipt.history_id,
        store_credit_id: receipt.store_credit_id,
        credits: receipt.credits,
        balance: receipt.balance,
    }
}

/// GET /api/store-credit - All balances with customer names and money values.
pub async fn list_balances(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let balances = state.manager.list_balances().await?;
    Ok(Json(balances))
}

/// POST /api/store-credit/add
pub async fn add_credit(
    _admin: AdminToken,
    State(state): State<AppState>,
    payload: Result<Json<CreditOperationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = body(payload)?;
    let receipt = state.manager.add_credit(&request).await?;
    Ok(Json(operation_response(receipt)))
}

/// POST /api/store-credit/deduct
pub async fn deduct_credit(
    _admin: AdminToken,
    State(state): State<AppState>,
    payload: Result<Json<CreditOperationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = body(payload)?;
    let receipt = state.manager.deduct_credit(&request).await?;
    Ok(Json(operation_response(receipt)))
}

/// GET /api/store-credit/balance/{customer_id}
pub async fn get_balance(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balance = state.manager.get_credit_balance(customer_id).await?;
    Ok(Json(balance))
}

/// GET /api/store-credit/customers - Customers with their effective rate.
pub async fn list_customers(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.manager.list_customers().await?;
    Ok(Json(customers))
}

/// GET /api/store-credit/config
pub async fn get_config(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rate = state.manager.default_value_per_credit().await?;
    Ok(Json(StoreCreditConfig {
        default_value_per_credit: rate.value,
    }))
}

/// PUT /api/store-credit/config
pub async fn update_config(
    _admin: AdminToken,
    State(state): State<AppState>,
    payload: Result<Json<StoreCreditConfig>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let config = body(payload)?;
    let rate = state
        .manager
        .set_default_value_per_credit(config.default_value_per_credit)
        .await?;
    Ok(Json(StoreCreditConfig {
        default_value_per_credit: rate.value,
    }))
}

/// GET /api/store-credit/{id}/history - Ledger entries, newest first.
pub async fn get_history(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = state.manager.history(id).await?;
    Ok(Json(history))
}

/// DELETE /api/store-credit/{id} - Removes the balance and its history.
pub async fn delete_store_credit(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.manager.delete_store_credit(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
