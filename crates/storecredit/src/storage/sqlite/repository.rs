//! SQLite repository implementation.
//!
//! Implements the repository traits from `storecredit_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use storecredit_core::auth::{AuthError, Session, SessionId, SessionRepository};
use storecredit_core::credit::{
    BalanceWrite, Customer, CustomerGroup, HistoryEntry, LedgerWrite, StoreCredit,
};
use storecredit_core::custom_field::{CustomField, CustomFieldSet, CustomFieldSetRelation};
use storecredit_core::state_machine::{StateMachine, StateMachineState, StateMachineTransition};
use storecredit_core::storage::{
    CustomFieldRepository, CustomerRepository, HistoryRepository, RepositoryError, Result,
    SettingsRepository, StateMachineRepository, StoreCreditRepository,
};

use super::conversions::{
    custom_fields_to_json, format_datetime, format_optional_uuid, parse_json,
    row_to_custom_field, row_to_custom_field_set, row_to_customer, row_to_customer_group,
    row_to_history_entry, row_to_session, row_to_state, row_to_state_machine,
    row_to_store_credit, row_to_transition, value_to_json,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Result of a ledger transaction.
enum CommitOutcome {
    Committed,
    Conflict,
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema and the host defaults.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::SEED_HOST_DEFAULTS)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// StoreCreditRepository implementation
// ============================================================================

#[async_trait]
impl StoreCreditRepository for SqliteRepository {
    async fn get_store_credit(&self, id: Uuid) -> Result<Option<StoreCredit>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_STORE_CREDIT_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_store_credit)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StoreCredit", id.to_string()))
    }

    async fn get_store_credit_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<StoreCredit>> {
        let customer_id_str = customer_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_STORE_CREDIT_BY_CUSTOMER)
                    .map_err(wrap_err)?;
                stmt.query_row([&customer_id_str], row_to_store_credit)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StoreCredit", customer_id.to_string()))
    }

    async fn list_store_credits(&self) -> Result<Vec<StoreCredit>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_STORE_CREDITS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_store_credit).map_err(wrap_err)?;

                let mut credits = Vec::new();
                for row_result in rows {
                    credits.push(row_result.map_err(wrap_err)?);
                }
                Ok(credits)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StoreCredit"))
    }

    async fn commit_ledger(&self, write: &LedgerWrite) -> Result<()> {
        let write = write.clone();
        let store_credit_id = write.balance.store_credit_id();

        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                match &write.balance {
                    BalanceWrite::Create(credit) => {
                        let inserted = tx.execute(
                            schema::INSERT_STORE_CREDIT,
                            rusqlite::params![
                                credit.id.to_string(),
                                credit.customer_id.to_string(),
                                credit.balance,
                                format_optional_uuid(credit.currency_id),
                                format_datetime(&credit.created_at),
                                credit.updated_at.as_ref().map(format_datetime),
                            ],
                        );
                        match inserted {
                            Ok(_) => {}
                            Err(e) if is_unique_violation(&e) => {
                                return Ok(CommitOutcome::Conflict)
                            }
                            Err(e) => return Err(wrap_err(e)),
                        }
                    }
                    BalanceWrite::Update {
                        id,
                        expected_balance,
                        new_balance,
                        currency_id,
                        updated_at,
                    } => {
                        let rows = tx
                            .execute(
                                schema::UPDATE_STORE_CREDIT_IF_BALANCE,
                                rusqlite::params![
                                    id.to_string(),
                                    new_balance,
                                    format_optional_uuid(*currency_id),
                                    format_datetime(updated_at),
                                    expected_balance,
                                ],
                            )
                            .map_err(wrap_err)?;
                        if rows == 0 {
                            return Ok(CommitOutcome::Conflict);
                        }
                    }
                }

                let entry = &write.entry;
                tx.execute(
                    schema::INSERT_HISTORY,
                    rusqlite::params![
                        entry.id.to_string(),
                        entry.store_credit_id.to_string(),
                        format_optional_uuid(entry.order_id),
                        entry.amount,
                        format_optional_uuid(entry.currency_id),
                        entry.reason,
                        entry.action_type.as_str(),
                        format_datetime(&entry.created_at),
                    ],
                )
                .map_err(wrap_err)?;

                tx.commit().map_err(wrap_err)?;
                Ok(CommitOutcome::Committed)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StoreCredit", store_credit_id.to_string()))?;

        match outcome {
            CommitOutcome::Committed => Ok(()),
            CommitOutcome::Conflict => Err(RepositoryError::Conflict {
                entity_type: "StoreCredit",
                id: store_credit_id.to_string(),
            }),
        }
    }

    async fn delete_store_credit(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::DELETE_HISTORY_BY_STORE_CREDIT, [&id_str])
                    .map_err(wrap_err)?;
                let rows = tx
                    .execute(schema::DELETE_STORE_CREDIT, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StoreCredit", id.to_string()))
    }
}

// ============================================================================
// HistoryRepository implementation
// ============================================================================

#[async_trait]
impl HistoryRepository for SqliteRepository {
    async fn get_history(&self, store_credit_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let id_str = store_credit_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_HISTORY_BY_STORE_CREDIT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&id_str], row_to_history_entry)
                    .map_err(wrap_err)?;

                let mut entries = Vec::new();
                for row_result in rows {
                    entries.push(row_result.map_err(wrap_err)?);
                }
                Ok(entries)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StoreCreditHistory"))
    }
}

// ============================================================================
// CustomerRepository implementation
// ============================================================================

#[async_trait]
impl CustomerRepository for SqliteRepository {
    async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_CUSTOMER_BY_ID).map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_customer)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Customer", id.to_string()))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_CUSTOMERS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_customer).map_err(wrap_err)?;

                let mut customers = Vec::new();
                for row_result in rows {
                    customers.push(row_result.map_err(wrap_err)?);
                }
                Ok(customers)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Customer"))
    }

    async fn get_customer_group(&self, id: Uuid) -> Result<Option<CustomerGroup>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CUSTOMER_GROUP_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_customer_group)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomerGroup", id.to_string()))
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<()> {
        let id = customer.id.to_string();
        let first_name = customer.first_name.clone();
        let last_name = customer.last_name.clone();
        let group_id = format_optional_uuid(customer.group_id);
        let custom_fields = custom_fields_to_json(&customer.custom_fields)?;
        let customer_id = customer.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_CUSTOMER,
                    rusqlite::params![id, first_name, last_name, group_id, custom_fields],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Customer", customer_id))
    }

    async fn upsert_customer_group(&self, group: &CustomerGroup) -> Result<()> {
        let id = group.id.to_string();
        let name = group.name.clone();
        let custom_fields = custom_fields_to_json(&group.custom_fields)?;
        let group_id = group.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_CUSTOMER_GROUP,
                    rusqlite::params![id, name, custom_fields],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomerGroup", group_id))
    }
}

// ============================================================================
// SettingsRepository implementation
// ============================================================================

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let key_str = key.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_SETTING).map_err(wrap_err)?;
                stmt.query_row([&key_str], |row| {
                    let raw: String = row.get(0)?;
                    parse_json(&raw)
                })
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Setting", key.to_string()))
    }

    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let key_str = key.to_string();
        let raw = value_to_json(value)?;

        self.conn
            .call(move |conn| {
                conn.execute(schema::UPSERT_SETTING, rusqlite::params![key_str, raw])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Setting", key.to_string()))
    }
}

// ============================================================================
// SessionRepository implementation
// ============================================================================

fn auth_storage_error(err: tokio_rusqlite::Error) -> AuthError {
    AuthError::Storage(err.to_string())
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn create_session(&self, session: &Session) -> std::result::Result<(), AuthError> {
        let id = session.id.as_str().to_string();
        let customer_id = session.customer_id.to_string();
        let created_at = format_datetime(&session.created_at);
        let expires_at = format_datetime(&session.expires_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SESSION,
                    rusqlite::params![id, customer_id, created_at, expires_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(auth_storage_error)
    }

    async fn get_session(&self, id: &SessionId) -> std::result::Result<Option<Session>, AuthError> {
        let id_str = id.as_str().to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_SESSION_BY_ID).map_err(wrap_err)?;
                stmt.query_row([&id_str], row_to_session)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(auth_storage_error)
    }
}

// ============================================================================
// StateMachineRepository implementation
// ============================================================================

#[async_trait]
impl StateMachineRepository for SqliteRepository {
    async fn find_state_machine(&self, technical_name: &str) -> Result<Option<StateMachine>> {
        let name = technical_name.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_STATE_MACHINE_BY_NAME)
                    .map_err(wrap_err)?;
                stmt.query_row([&name], row_to_state_machine)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StateMachine", technical_name))
    }

    async fn find_state(
        &self,
        state_machine_id: Uuid,
        technical_name: &str,
    ) -> Result<Option<StateMachineState>> {
        let machine_id = state_machine_id.to_string();
        let name = technical_name.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_STATE_BY_NAME).map_err(wrap_err)?;
                stmt.query_row([&machine_id, &name], row_to_state)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StateMachineState", technical_name))
    }

    async fn create_state(&self, state: &StateMachineState) -> Result<()> {
        let id = state.id.to_string();
        let machine_id = state.state_machine_id.to_string();
        let technical_name = state.technical_name.clone();
        let name = state.name.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_STATE,
                    rusqlite::params![id, machine_id, technical_name, name],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "StateMachineState", state.technical_name.clone())
            })
    }

    async fn delete_state(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_STATE, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "StateMachineState", id.to_string()))
    }

    async fn list_transitions(
        &self,
        state_machine_id: Uuid,
    ) -> Result<Vec<StateMachineTransition>> {
        let machine_id = state_machine_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TRANSITIONS_BY_MACHINE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&machine_id], row_to_transition)
                    .map_err(wrap_err)?;

                let mut transitions = Vec::new();
                for row_result in rows {
                    transitions.push(row_result.map_err(wrap_err)?);
                }
                Ok(transitions)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StateMachineTransition"))
    }

    async fn create_transition(&self, transition: &StateMachineTransition) -> Result<()> {
        let id = transition.id.to_string();
        let machine_id = transition.state_machine_id.to_string();
        let action_name = transition.action_name.clone();
        let from_state_id = transition.from_state_id.to_string();
        let to_state_id = transition.to_state_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TRANSITION,
                    rusqlite::params![id, machine_id, action_name, from_state_id, to_state_id],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(
                    e,
                    "StateMachineTransition",
                    transition.action_name.clone(),
                )
            })
    }

    async fn delete_transitions(&self, ids: &[Uuid]) -> Result<()> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                for id in &ids {
                    tx.execute(schema::DELETE_TRANSITION, [id])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StateMachineTransition"))
    }

    async fn find_history_referencing(&self, state_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let state_ids: Vec<String> = state_ids.iter().map(Uuid::to_string).collect();

        let raw_ids = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_HISTORY_REFERENCING_STATE)
                    .map_err(wrap_err)?;
                let mut ids: Vec<String> = Vec::new();
                for state_id in &state_ids {
                    let rows = stmt
                        .query_map([state_id], |row| row.get::<_, String>(0))
                        .map_err(wrap_err)?;
                    for row_result in rows {
                        let id = row_result.map_err(wrap_err)?;
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
                Ok(ids)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StateMachineHistory"))?;

        raw_ids
            .iter()
            .map(|id| {
                Uuid::parse_str(id).map_err(|e| RepositoryError::InvalidData(e.to_string()))
            })
            .collect()
    }

    async fn delete_history(&self, ids: &[Uuid]) -> Result<()> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                for id in &ids {
                    tx.execute(schema::DELETE_STATE_HISTORY, [id])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StateMachineHistory"))
    }
}

// ============================================================================
// CustomFieldRepository implementation
// ============================================================================

#[async_trait]
impl CustomFieldRepository for SqliteRepository {
    async fn custom_fields_available(&self) -> Result<bool> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row(schema::COUNT_CUSTOM_FIELD_TABLES, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count == 3)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CustomFieldSet"))
    }

    async fn find_set(&self, name: &str) -> Result<Option<CustomFieldSet>> {
        let name_str = name.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CUSTOM_FIELD_SET_BY_NAME)
                    .map_err(wrap_err)?;
                stmt.query_row([&name_str], row_to_custom_field_set)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomFieldSet", name))
    }

    async fn create_set(&self, set: &CustomFieldSet) -> Result<()> {
        let id = set.id.to_string();
        let name = set.name.clone();
        let config = value_to_json(&set.config)?;
        let active = set.active;
        let created_at = format_datetime(&set.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CUSTOM_FIELD_SET,
                    rusqlite::params![id, name, config, active, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomFieldSet", set.name.clone()))
    }

    async fn find_field(&self, name: &str) -> Result<Option<CustomField>> {
        let name_str = name.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CUSTOM_FIELD_BY_NAME)
                    .map_err(wrap_err)?;
                stmt.query_row([&name_str], row_to_custom_field)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomField", name))
    }

    async fn create_field(&self, field: &CustomField) -> Result<()> {
        let id = field.id.to_string();
        let name = field.name.clone();
        let field_type = field.field_type.clone();
        let config = value_to_json(&field.config)?;
        let active = field.active;
        let set_id = field.set_id.to_string();
        let created_at = format_datetime(&field.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CUSTOM_FIELD,
                    rusqlite::params![id, name, field_type, config, active, set_id, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CustomField", field.name.clone()))
    }

    async fn relation_exists(&self, set_id: Uuid, entity_name: &str) -> Result<bool> {
        let set_id_str = set_id.to_string();
        let entity = entity_name.to_string();

        self.conn
            .call(move |conn| {
                let count: i64 = conn
                    .query_row(schema::COUNT_SET_RELATIONS, [&set_id_str, &entity], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                Ok(count > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CustomFieldSetRelation"))
    }

    async fn create_relation(&self, relation: &CustomFieldSetRelation) -> Result<()> {
        let id = relation.id.to_string();
        let set_id = relation.set_id.to_string();
        let entity_name = relation.entity_name.clone();
        let created_at = format_datetime(&relation.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SET_RELATION,
                    rusqlite::params![id, set_id, entity_name, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CustomFieldSetRelation"))
    }

    async fn delete_relations(&self, set_id: Uuid) -> Result<u64> {
        let set_id_str = set_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_SET_RELATIONS, [&set_id_str])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CustomFieldSetRelation"))
    }
}
