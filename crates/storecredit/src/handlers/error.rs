use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use storecredit_core::credit::{credit_error_to_status_code, CreditError, ErrorResponse};
use storecredit_core::storage::{repository_error_to_status_code, RepositoryError};

/// Request body that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid request body: {0}")]
pub struct InvalidBody(pub String);

/// Handler error. Known domain errors pick their own status code and kind;
/// anything else is a 500.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_kind(&self) -> (u16, &'static str) {
        if let Some(credit_error) = self.0.downcast_ref::<CreditError>() {
            (credit_error_to_status_code(credit_error), credit_error.kind())
        } else if self.0.downcast_ref::<InvalidBody>().is_some() {
            (400, "invalid_body")
        } else if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            (repository_error_to_status_code(repo_error), "storage")
        } else {
            (500, "internal")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, kind) = self.status_and_kind();
        let status_code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        (
            status_code,
            Json(ErrorResponse::new(kind, self.0.to_string())),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_credit_errors_keep_their_status() {
        let err = AppError::from(CreditError::InsufficientBalance {
            available: 1.0,
            requested: 2.0,
        });
        assert_eq!(err.status_and_kind(), (422, "insufficient_balance"));

        let err = AppError::from(CreditError::CustomerNotFound(Uuid::nil()));
        assert_eq!(err.status_and_kind(), (404, "customer_not_found"));
    }

    #[test]
    fn test_repository_errors_map_to_storage() {
        let err = AppError::from(RepositoryError::ConnectionFailed("down".into()));
        assert_eq!(err.status_and_kind(), (503, "storage"));
    }

    #[test]
    fn test_invalid_body_is_bad_request() {
        let err = AppError::from(InvalidBody("missing field `amount`".into()));
        assert_eq!(err.status_and_kind(), (400, "invalid_body"));
    }

    #[test]
    fn test_unknown_errors_are_internal() {
        let err = AppError(anyhow::anyhow!("boom"));
        assert_eq!(err.status_and_kind(), (500, "internal"));
    }
}
