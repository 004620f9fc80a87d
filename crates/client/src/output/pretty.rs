//! Pretty output formatting.

use storecredit_core::credit::{
    CreditBalance, CreditOperationResponse, CustomerRate, HistoryEntry, StoreCreditConfig,
    StoreCreditSummary,
};

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Format one balance row for display.
pub fn format_summary(summary: &StoreCreditSummary) -> String {
    let name = if summary.customer_full_name.is_empty() {
        "(unknown customer)"
    } else {
        summary.customer_full_name.as_str()
    };
    let mut output = format!(
        "{}\n  ID: {}\n  Customer: {}\n  Credits: {}\n  Balance: {} ({} per credit)",
        name,
        summary.id,
        summary.customer_id,
        money(summary.credits),
        money(summary.balance),
        money(summary.value_per_credit)
    );
    if let Some(updated_at) = summary.updated_at {
        output.push_str(&format!("\n  Updated: {}", updated_at.format("%Y-%m-%d %H:%M")));
    }
    output
}

/// Format balance rows for display.
pub fn format_summaries(summaries: &[StoreCreditSummary]) -> String {
    if summaries.is_empty() {
        return "No store credit found.".to_string();
    }
    let mut output = format!("STORE CREDIT ({})\n", summaries.len());
    output.push_str(&"-".repeat(40));
    for summary in summaries {
        output.push_str(&format!("\n{}", format_summary(summary)));
        output.push('\n');
    }
    output
}

/// Format a customer balance for display.
pub fn format_balance(balance: &CreditBalance) -> String {
    let id = balance
        .store_credit_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Customer {}\n  Store credit: {}\n  Credits: {}\n  Balance: {}\n  Value per credit: {} ({:?})",
        balance.customer_id,
        id,
        money(balance.balance_credits),
        money(balance.balance_amount),
        money(balance.value_per_credit),
        balance.rate_source
    )
}

/// Format the result of an add or deduct.
pub fn format_operation(response: &CreditOperationResponse) -> String {
    format!(
        "History entry {}\n  Credits: {}\n{}",
        response.history_id,
        money(response.credits),
        format_balance(&response.balance)
    )
}

/// Format ledger entries for display.
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history found.".to_string();
    }
    let mut output = format!("HISTORY ({})\n", entries.len());
    output.push_str(&"-".repeat(40));
    for entry in entries {
        output.push_str(&format!(
            "\n{}  {:<6} {:>10}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.action_type.as_str(),
            money(entry.amount),
            entry.reason
        ));
        if let Some(order_id) = entry.order_id {
            output.push_str(&format!("  (order {})", order_id));
        }
    }
    output
}

/// Format customers with their rates.
pub fn format_customers(customers: &[CustomerRate]) -> String {
    if customers.is_empty() {
        return "No customers found.".to_string();
    }
    let mut output = format!("CUSTOMERS ({})\n", customers.len());
    output.push_str(&"-".repeat(40));
    for customer in customers {
        output.push_str(&format!(
            "\n{}\n  ID: {}\n  Value per credit: {} ({:?})\n",
            customer.name,
            customer.id,
            money(customer.value_per_credit),
            customer.rate_source
        ));
    }
    output
}

pub fn format_config(config: &StoreCreditConfig) -> String {
    format!(
        "Default value per credit: {}",
        money(config.default_value_per_credit)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storecredit_core::credit::{ActionType, RateSource};
    use uuid::Uuid;

    #[test]
    fn test_format_history_lists_entries() {
        let entry = HistoryEntry {
            id: Uuid::nil(),
            store_credit_id: Uuid::nil(),
            order_id: None,
            amount: 12.5,
            currency_id: None,
            reason: "Refund".to_string(),
            action_type: ActionType::Deduct,
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 0).unwrap(),
        };
        let output = format_history(&[entry]);
        assert!(output.starts_with("HISTORY (1)"));
        assert!(output.contains("2026-01-02 03:04"));
        assert!(output.contains("deduct"));
        assert!(output.contains("12.50"));
        assert!(output.contains("Refund"));
    }

    #[test]
    fn test_format_balance_without_row() {
        let balance = CreditBalance {
            customer_id: Uuid::nil(),
            store_credit_id: None,
            balance_credits: 0.0,
            balance_amount: 0.0,
            balance_currency_id: None,
            value_per_credit: 1.0,
            rate_source: RateSource::Fallback,
        };
        let output = format_balance(&balance);
        assert!(output.contains("Store credit: none"));
        assert!(output.contains("Value per credit: 1.00 (Fallback)"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_summaries(&[]), "No store credit found.");
        assert_eq!(format_customers(&[]), "No customers found.");
        assert_eq!(format_history(&[]), "No history found.");
    }
}
