//! Demo customers, rates and a storefront session for local runs.

use chrono::Utc;
use uuid::Uuid;

use storecredit_core::auth::{new_session, Session};
use storecredit_core::credit::{
    CreditOperationRequest, Customer, CustomerGroup, RateSource, VALUE_PER_UNIT_FIELD,
};

use crate::state::AppState;

pub const WHOLESALE_GROUP_ID: Uuid = Uuid::from_u128(0x5c0e_0000_0000_4000_8000_0000_0000_0001);
pub const ADA_ID: Uuid = Uuid::from_u128(0x5c0e_0000_0000_4000_8000_0000_0000_0101);
pub const GRACE_ID: Uuid = Uuid::from_u128(0x5c0e_0000_0000_4000_8000_0000_0000_0102);
pub const ALAN_ID: Uuid = Uuid::from_u128(0x5c0e_0000_0000_4000_8000_0000_0000_0103);

/// Customers with one of each rate source: own override, group override and
/// the global default (seeded as 1.0 when unset).
pub fn demo_customers() -> (CustomerGroup, Vec<Customer>) {
    let wholesale = CustomerGroup::new("Wholesale")
        .with_id(WHOLESALE_GROUP_ID)
        .with_custom_field(VALUE_PER_UNIT_FIELD, 2.0);

    let customers = vec![
        Customer::new("Ada", "Lovelace")
            .with_id(ADA_ID)
            .with_custom_field(VALUE_PER_UNIT_FIELD, 0.5),
        Customer::new("Grace", "Hopper")
            .with_id(GRACE_ID)
            .with_group(WHOLESALE_GROUP_ID),
        Customer::new("Alan", "Turing").with_id(ALAN_ID),
    ];

    (wholesale, customers)
}

/// Seeds demo data and returns a fresh session for the first customer.
///
/// Safe to run repeatedly: customers are upserted and the welcome credit is
/// only booked while the customer has no ledger entries.
pub async fn seed_demo(state: &AppState) -> anyhow::Result<Session> {
    let (group, customers) = demo_customers();
    state.customers.upsert_customer_group(&group).await?;
    for customer in &customers {
        state.customers.upsert_customer(customer).await?;
    }

    if state.manager.default_value_per_credit().await?.source == RateSource::Fallback {
        state.manager.set_default_value_per_credit(1.0).await?;
    }

    if state.manager.customer_history(ADA_ID).await?.is_empty() {
        state
            .manager
            .add_credit(&CreditOperationRequest {
                customer_id: ADA_ID,
                amount: 25.0,
                reason: Some("Welcome bonus".to_string()),
                order_id: None,
                currency_id: None,
            })
            .await?;
    }

    let session = new_session(ADA_ID, Utc::now(), state.config.session_ttl());
    state.sessions.create_session(&session).await?;

    tracing::info!(
        customers = customers.len(),
        session = %session.id.as_str(),
        "Seeded demo data"
    );
    Ok(session)
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::tests::test_state;

    #[tokio::test]
    async fn test_seed_covers_every_rate_source() {
        let state = test_state(Config::default());
        seed_demo(&state).await.unwrap();

        let rates = state.manager.list_customers().await.unwrap();
        let source = |id: Uuid| rates.iter().find(|r| r.id == id).unwrap().rate_source;
        assert_eq!(source(ADA_ID), RateSource::Customer);
        assert_eq!(source(GRACE_ID), RateSource::CustomerGroup);
        assert_eq!(source(ALAN_ID), RateSource::Default);
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let state = test_state(Config::default());
        let first = seed_demo(&state).await.unwrap();
        let second = seed_demo(&state).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(state.manager.customer_history(ADA_ID).await.unwrap().len(), 1);
        let balance = state.manager.get_credit_balance(ADA_ID).await.unwrap();
        assert_eq!(balance.balance_credits, 50.0);
        assert_eq!(balance.balance_amount, 25.0);
    }
}
