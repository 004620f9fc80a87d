//! HTTP client for the store credit admin API.

pub mod config;
pub mod credits;
pub mod customers;
pub mod health;

use storecredit_core::credit::ErrorResponse;

use crate::error::{ClientError, Result};

/// HTTP client for the store credit admin API.
#[derive(Debug, Clone)]
pub struct StoreCreditClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl StoreCreditClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sets the admin bearer token sent with every API request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Create from environment (STORECREDIT_URL and STORECREDIT_ADMIN_TOKEN).
    pub fn from_env() -> Self {
        let base_url = std::env::var("STORECREDIT_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url).with_token(std::env::var("STORECREDIT_ADMIN_TOKEN").ok())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Decode a success body or turn the error body into a [`ClientError`].
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Handle responses without a body.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error_from_body(status, &text)
}

/// Maps a non-success status and body to a [`ClientError`].
///
/// Bodies in the API's `{success, error, message}` shape contribute their
/// kind and message; anything else is passed through as the message.
pub fn error_from_body(status: u16, body: &str) -> ClientError {
    let (kind, message) = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => (error.error, error.message),
        Err(_) => ("unknown".to_string(), body.to_string()),
    };

    match status {
        401 => ClientError::Unauthorized { message },
        404 => ClientError::NotFound { message },
        _ => ClientError::ServerError {
            status,
            kind,
            message,
        },
    }
}
