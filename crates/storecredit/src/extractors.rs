//! Axum extractors for admin and storefront authentication.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use storecredit_core::auth::{is_session_expired, parse_bearer_token, SessionId};
use storecredit_core::credit::{Customer, ErrorResponse};

use crate::state::AppState;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
}

/// Guard for the admin API. Rejects with 401 unless the request carries
/// `Authorization: Bearer <admin token>`.
pub struct AdminToken;

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("unauthorized", message)),
            )
        };

        let Some(expected) = state.config.admin_token.as_deref() else {
            return Err(unauthorized("Admin API is disabled"));
        };

        match bearer_token(parts) {
            Some(token) if token == expected => Ok(AdminToken),
            Some(_) => {
                tracing::warn!("Rejected admin request with invalid token");
                Err(unauthorized("Invalid admin token"))
            }
            None => Err(unauthorized("Missing bearer token")),
        }
    }
}

/// Customer behind the storefront session, if any.
///
/// The session id is read from the bearer header first, then from the
/// session cookie. Unknown or expired sessions yield `None`.
pub struct OptionalCustomer(pub Option<Customer>);

impl FromRequestParts<AppState> for OptionalCustomer {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = match bearer_token(parts) {
            Some(token) => SessionId::new(token.to_string()),
            None => {
                let jar = CookieJar::from_headers(&parts.headers);
                match jar.get(&state.config.session_cookie_name) {
                    Some(cookie) => SessionId::new(cookie.value().to_string()),
                    None => return Ok(OptionalCustomer(None)),
                }
            }
        };

        let session = match state.sessions.get_session(&session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(OptionalCustomer(None)),
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"));
            }
        };

        if is_session_expired(&session, Utc::now()) {
            return Ok(OptionalCustomer(None));
        }

        match state.customers.get_customer(session.customer_id).await {
            Ok(customer) => Ok(OptionalCustomer(customer)),
            Err(e) => {
                tracing::error!(error = %e, "Customer lookup failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Customer lookup failed"))
            }
        }
    }
}
