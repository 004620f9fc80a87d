use async_trait::async_trait;
use uuid::Uuid;

use crate::credit::{Customer, CustomerGroup, HistoryEntry, LedgerWrite, StoreCredit};
use crate::custom_field::{CustomField, CustomFieldSet, CustomFieldSetRelation};
use crate::state_machine::{StateMachine, StateMachineState, StateMachineTransition};

use super::Result;

/// Repository for balance rows.
#[async_trait]
pub trait StoreCreditRepository: Send + Sync {
    /// Gets a balance row by its ID.
    async fn get_store_credit(&self, id: Uuid) -> Result<Option<StoreCredit>>;

    /// Gets the balance row of a customer.
    async fn get_store_credit_by_customer(&self, customer_id: Uuid)
        -> Result<Option<StoreCredit>>;

    /// Lists every balance row.
    async fn list_store_credits(&self) -> Result<Vec<StoreCredit>>;

    /// Atomically applies a balance change and appends its history entry.
    ///
    /// Returns [`RepositoryError::Conflict`](super::RepositoryError::Conflict)
    /// when an update finds a balance other than `expected_balance`, or a
    /// create finds an existing row for the customer. Nothing is written in
    /// that case.
    async fn commit_ledger(&self, write: &LedgerWrite) -> Result<()>;

    /// Deletes a balance row together with its history.
    async fn delete_store_credit(&self, id: Uuid) -> Result<()>;
}

/// Read access to the append-only ledger.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Gets all entries of a balance row, newest first.
    async fn get_history(&self, store_credit_id: Uuid) -> Result<Vec<HistoryEntry>>;
}

/// Read access to host customers and customer groups.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Gets a customer by ID.
    async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>>;

    /// Lists all customers ordered by last name.
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Gets a customer group by ID.
    async fn get_customer_group(&self, id: Uuid) -> Result<Option<CustomerGroup>>;

    /// Inserts or replaces a customer (demo seeding and tests).
    async fn upsert_customer(&self, customer: &Customer) -> Result<()>;

    /// Inserts or replaces a customer group (demo seeding and tests).
    async fn upsert_customer_group(&self, group: &CustomerGroup) -> Result<()>;
}

/// Key/value system settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Gets a setting's raw JSON value.
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Stores a setting.
    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()>;
}

/// The host's generic state-machine tables.
#[async_trait]
pub trait StateMachineRepository: Send + Sync {
    /// Finds a state machine by technical name.
    async fn find_state_machine(&self, technical_name: &str) -> Result<Option<StateMachine>>;

    /// Finds a state of a machine by technical name.
    async fn find_state(
        &self,
        state_machine_id: Uuid,
        technical_name: &str,
    ) -> Result<Option<StateMachineState>>;

    /// Creates a state.
    async fn create_state(&self, state: &StateMachineState) -> Result<()>;

    /// Deletes a state.
    async fn delete_state(&self, id: Uuid) -> Result<()>;

    /// Lists the transitions of a machine.
    async fn list_transitions(&self, state_machine_id: Uuid)
        -> Result<Vec<StateMachineTransition>>;

    /// Creates a transition.
    async fn create_transition(&self, transition: &StateMachineTransition) -> Result<()>;

    /// Deletes transitions by ID.
    async fn delete_transitions(&self, ids: &[Uuid]) -> Result<()>;

    /// IDs of history rows whose from- or to-state is one of `state_ids`.
    async fn find_history_referencing(&self, state_ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Deletes history rows by ID.
    async fn delete_history(&self, ids: &[Uuid]) -> Result<()>;
}

/// The host's custom-field definition tables.
#[async_trait]
pub trait CustomFieldRepository: Send + Sync {
    /// Whether the custom-field tables exist in this store.
    async fn custom_fields_available(&self) -> Result<bool>;

    /// Finds a custom-field set by name.
    async fn find_set(&self, name: &str) -> Result<Option<CustomFieldSet>>;

    /// Creates a custom-field set.
    async fn create_set(&self, set: &CustomFieldSet) -> Result<()>;

    /// Finds a custom field by name.
    async fn find_field(&self, name: &str) -> Result<Option<CustomField>>;

    /// Creates a custom field.
    async fn create_field(&self, field: &CustomField) -> Result<()>;

    /// Whether a set is attached to an entity.
    async fn relation_exists(&self, set_id: Uuid, entity_name: &str) -> Result<bool>;

    /// Attaches a set to an entity.
    async fn create_relation(&self, relation: &CustomFieldSetRelation) -> Result<()>;

    /// Detaches a set from every entity, returning how many rows were removed.
    async fn delete_relations(&self, set_id: Uuid) -> Result<u64>;
}
