use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form custom field values attached to host entities.
pub type CustomFields = serde_json::Map<String, serde_json::Value>;

/// Reason recorded when a ledger entry is created without one.
pub const DEFAULT_REASON: &str = "Not specified";

/// Balance row for a single customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCredit {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Balance in credit units.
    pub balance: f64,
    pub currency_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoreCredit {
    /// Creates a new balance row for a customer.
    pub fn new(customer_id: Uuid, balance: f64, currency_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            balance,
            currency_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Add,
    Deduct,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Add => "add",
            ActionType::Deduct => "deduct",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(ActionType::Add),
            "deduct" => Ok(ActionType::Deduct),
            other => Err(format!("unknown action type: {other}")),
        }
    }
}

/// Immutable ledger row recording one balance change.
///
/// `amount` is the money value of the transaction, not the credit delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub store_credit_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: f64,
    pub currency_id: Option<Uuid>,
    pub reason: String,
    pub action_type: ActionType,
    pub created_at: DateTime<Utc>,
}

/// Host customer, read for names and rate overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl Customer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            group_id: None,
            custom_fields: CustomFields::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_custom_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Host customer group; may carry a rate override for its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

impl CustomerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            custom_fields: CustomFields::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_custom_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }
}

/// Where the effective value per credit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    Customer,
    CustomerGroup,
    Default,
    Fallback,
}

/// Effective money value of one credit for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePerCredit {
    pub value: f64,
    pub source: RateSource,
}

/// Balance view returned to callers: credits plus their money equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    pub customer_id: Uuid,
    pub store_credit_id: Option<Uuid>,
    pub balance_credits: f64,
    pub balance_amount: f64,
    pub balance_currency_id: Option<Uuid>,
    pub value_per_credit: f64,
    pub rate_source: RateSource,
}

/// One row of the admin balance grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreditSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_full_name: String,
    pub credits: f64,
    pub balance: f64,
    pub value_per_credit: f64,
    pub currency_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Customer option for the admin "add credit" picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRate {
    pub id: Uuid,
    pub name: String,
    pub value_per_credit: f64,
    pub rate_source: RateSource,
}

/// Result of a committed ledger operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub history_id: Uuid,
    pub store_credit_id: Uuid,
    /// Credit delta applied by this operation (always positive).
    pub credits: f64,
    pub balance: CreditBalance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_round_trips_through_str() {
        assert_eq!("add".parse::<ActionType>().unwrap(), ActionType::Add);
        assert_eq!("deduct".parse::<ActionType>().unwrap(), ActionType::Deduct);
        assert!("refund".parse::<ActionType>().is_err());
        assert_eq!(ActionType::Deduct.to_string(), "deduct");
    }

    #[test]
    fn test_action_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ActionType::Add).unwrap(), "\"add\"");
    }

    #[test]
    fn test_customer_full_name() {
        assert_eq!(Customer::new("Ada", "Lovelace").full_name(), "Ada Lovelace");
        assert_eq!(Customer::new("", "Cher").full_name(), "Cher");
    }

    #[test]
    fn test_store_credit_serializes_camel_case() {
        let credit = StoreCredit::new(Uuid::nil(), 2.5, None);
        let json = serde_json::to_value(&credit).unwrap();
        assert_eq!(json["customerId"], Uuid::nil().to_string());
        assert_eq!(json["balance"], 2.5);
    }
}
