//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use storecredit_core::auth::{Session, SessionId};
use storecredit_core::credit::{
    ActionType, Customer, CustomerGroup, CustomFields, HistoryEntry, StoreCredit,
};
use storecredit_core::custom_field::{CustomField, CustomFieldSet};
use storecredit_core::state_machine::{StateMachine, StateMachineState, StateMachineTransition};
use storecredit_core::storage::RepositoryError;

// ============================================================================
// Ledger conversions
// ============================================================================

/// Convert a SQLite row to a StoreCredit.
///
/// Expected columns: id, customer_id, balance, currency_id, created_at, updated_at
pub fn row_to_store_credit(row: &Row) -> rusqlite::Result<StoreCredit> {
    let id: String = row.get(0)?;
    let customer_id: String = row.get(1)?;
    let balance: f64 = row.get(2)?;
    let currency_id: Option<String> = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: Option<String> = row.get(5)?;

    Ok(StoreCredit {
        id: parse_uuid(&id)?,
        customer_id: parse_uuid(&customer_id)?,
        balance,
        currency_id: parse_optional_uuid(currency_id.as_deref())?,
        created_at: parse_datetime(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_datetime).transpose()?,
    })
}

/// Convert a SQLite row to a HistoryEntry.
///
/// Expected columns: id, store_credit_id, order_id, amount, currency_id,
/// reason, action_type, created_at
pub fn row_to_history_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let id: String = row.get(0)?;
    let store_credit_id: String = row.get(1)?;
    let order_id: Option<String> = row.get(2)?;
    let amount: f64 = row.get(3)?;
    let currency_id: Option<String> = row.get(4)?;
    let reason: String = row.get(5)?;
    let action_type: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(HistoryEntry {
        id: parse_uuid(&id)?,
        store_credit_id: parse_uuid(&store_credit_id)?,
        order_id: parse_optional_uuid(order_id.as_deref())?,
        amount,
        currency_id: parse_optional_uuid(currency_id.as_deref())?,
        reason,
        action_type: parse_action_type(&action_type)?,
        created_at: parse_datetime(&created_at)?,
    })
}

// ============================================================================
// Host conversions
// ============================================================================

/// Expected columns: id, first_name, last_name, customer_group_id, custom_fields
pub fn row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
    let id: String = row.get(0)?;
    let first_name: String = row.get(1)?;
    let last_name: String = row.get(2)?;
    let group_id: Option<String> = row.get(3)?;
    let custom_fields: String = row.get(4)?;

    Ok(Customer {
        id: parse_uuid(&id)?,
        first_name,
        last_name,
        group_id: parse_optional_uuid(group_id.as_deref())?,
        custom_fields: parse_custom_fields(&custom_fields)?,
    })
}

/// Expected columns: id, name, custom_fields
pub fn row_to_customer_group(row: &Row) -> rusqlite::Result<CustomerGroup> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let custom_fields: String = row.get(2)?;

    Ok(CustomerGroup {
        id: parse_uuid(&id)?,
        name,
        custom_fields: parse_custom_fields(&custom_fields)?,
    })
}

/// Expected columns: id, customer_id, created_at, expires_at
pub fn row_to_session(row: &Row) -> rusqlite::Result<Session> {
    let id: String = row.get(0)?;
    let customer_id: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    let expires_at: String = row.get(3)?;

    Ok(Session {
        id: SessionId::new(id),
        customer_id: parse_uuid(&customer_id)?,
        created_at: parse_datetime(&created_at)?,
        expires_at: parse_datetime(&expires_at)?,
    })
}

/// Expected columns: id, technical_name, name
pub fn row_to_state_machine(row: &Row) -> rusqlite::Result<StateMachine> {
    let id: String = row.get(0)?;
    Ok(StateMachine {
        id: parse_uuid(&id)?,
        technical_name: row.get(1)?,
        name: row.get(2)?,
    })
}

/// Expected columns: id, state_machine_id, technical_name, name
pub fn row_to_state(row: &Row) -> rusqlite::Result<StateMachineState> {
    let id: String = row.get(0)?;
    let state_machine_id: String = row.get(1)?;
    Ok(StateMachineState {
        id: parse_uuid(&id)?,
        state_machine_id: parse_uuid(&state_machine_id)?,
        technical_name: row.get(2)?,
        name: row.get(3)?,
    })
}

/// Expected columns: id, state_machine_id, action_name, from_state_id, to_state_id
pub fn row_to_transition(row: &Row) -> rusqlite::Result<StateMachineTransition> {
    let id: String = row.get(0)?;
    let state_machine_id: String = row.get(1)?;
    let action_name: String = row.get(2)?;
    let from_state_id: String = row.get(3)?;
    let to_state_id: String = row.get(4)?;
    Ok(StateMachineTransition {
        id: parse_uuid(&id)?,
        state_machine_id: parse_uuid(&state_machine_id)?,
        action_name,
        from_state_id: parse_uuid(&from_state_id)?,
        to_state_id: parse_uuid(&to_state_id)?,
    })
}

/// Expected columns: id, name, config, active, created_at
pub fn row_to_custom_field_set(row: &Row) -> rusqlite::Result<CustomFieldSet> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let config: String = row.get(2)?;
    let active: bool = row.get(3)?;
    let created_at: String = row.get(4)?;
    Ok(CustomFieldSet {
        id: parse_uuid(&id)?,
        name,
        config: parse_json(&config)?,
        active,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Expected columns: id, name, type, config, active, set_id, created_at
pub fn row_to_custom_field(row: &Row) -> rusqlite::Result<CustomField> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let field_type: String = row.get(2)?;
    let config: String = row.get(3)?;
    let active: bool = row.get(4)?;
    let set_id: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(CustomField {
        id: parse_uuid(&id)?,
        name,
        field_type,
        config: parse_json(&config)?,
        active,
        set_id: parse_uuid(&set_id)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Serialize custom fields for a TEXT column.
pub fn custom_fields_to_json(fields: &CustomFields) -> Result<String, RepositoryError> {
    serde_json::to_string(fields).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Serialize any JSON value for a TEXT column.
pub fn value_to_json(value: &serde_json::Value) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

// ============================================================================
// Helper functions
// ============================================================================

fn conversion_error<E>(e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(conversion_error)
}

fn parse_optional_uuid(s: Option<&str>) -> rusqlite::Result<Option<Uuid>> {
    s.map(parse_uuid).transpose()
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

pub fn parse_json(s: &str) -> rusqlite::Result<serde_json::Value> {
    serde_json::from_str(s).map_err(conversion_error)
}

fn parse_custom_fields(s: &str) -> rusqlite::Result<CustomFields> {
    match parse_json(s)? {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(CustomFields::new()),
        other => Err(conversion_error(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("custom fields must be an object, got {other}"),
        ))),
    }
}

fn parse_action_type(s: &str) -> rusqlite::Result<ActionType> {
    s.parse::<ActionType>().map_err(|e| {
        conversion_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed microsecond precision keeps lexical and chronological order equal.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn format_optional_uuid(id: Option<Uuid>) -> Option<String> {
    id.map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let a = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2024-06-15T10:30:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(format_datetime(&a), "2024-06-15T10:30:00.000000Z");
        assert!(format_datetime(&a) < format_datetime(&b));
    }

    #[test]
    fn test_format_datetime_round_trips() {
        let now = DateTime::parse_from_rfc3339("2024-06-15T10:30:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_datetime(&format_datetime(&now)).unwrap(), now);
    }

    #[test]
    fn test_parse_custom_fields() {
        let fields = parse_custom_fields(r#"{"store_credit_value_per_unit": 3}"#).unwrap();
        assert_eq!(fields["store_credit_value_per_unit"], 3);
        assert!(parse_custom_fields("null").unwrap().is_empty());
        assert!(parse_custom_fields("[1]").is_err());
    }

    #[test]
    fn test_parse_action_type() {
        assert_eq!(parse_action_type("add").unwrap(), ActionType::Add);
        assert_eq!(parse_action_type("deduct").unwrap(), ActionType::Deduct);
        assert!(parse_action_type("refund").is_err());
    }

    #[test]
    fn test_parse_optional_uuid() {
        assert_eq!(parse_optional_uuid(None).unwrap(), None);
        assert!(parse_optional_uuid(Some("nope")).is_err());
    }
}
