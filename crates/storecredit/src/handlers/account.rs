//! Storefront "My store credit" page.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use storecredit_core::auth::login_redirect_target;
use storecredit_core::credit::{ActionType, HistoryEntry};

use crate::{extractors::OptionalCustomer, handlers::error::AppError, state::AppState};

const PAGE_PATH: &str = "/account/store-credit";

/// Template wrapper that converts Askama templates into HTML responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}

/// One ledger line as shown to the customer.
struct HistoryRow {
    date: String,
    action: &'static str,
    sign: &'static str,
    css_class: &'static str,
    amount: String,
    reason: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let (action, sign) = match entry.action_type {
            ActionType::Add => ("Added", "+"),
            ActionType::Deduct => ("Used", "-"),
        };
        Self {
            date: entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            action,
            sign,
            css_class: entry.action_type.as_str(),
            amount: format!("{:.2}", entry.amount),
            reason: entry.reason.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "store_credit.html")]
struct StoreCreditTemplate {
    customer_name: String,
    has_balance: bool,
    credits: String,
    balance: String,
    value_per_credit: String,
    history: Vec<HistoryRow>,
}

/// Handler for GET /account/store-credit.
///
/// Redirects to the login page when there is no valid session.
pub async fn store_credit_page(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Response, AppError> {
    let Some(customer) = customer else {
        let target = login_redirect_target(&state.config.login_path, PAGE_PATH);
        return Ok(Redirect::to(&target).into_response());
    };

    let balance = state.manager.get_credit_balance(customer.id).await?;
    let history = state.manager.customer_history(customer.id).await?;

    let template = StoreCreditTemplate {
        customer_name: customer.full_name(),
        has_balance: balance.store_credit_id.is_some(),
        credits: format!("{:.2}", balance.balance_credits),
        balance: format!("{:.2}", balance.balance_amount),
        value_per_credit: format!("{:.2}", balance.value_per_credit),
        history: history.iter().map(HistoryRow::from).collect(),
    };

    Ok(HtmlTemplate(template).into_response())
}
