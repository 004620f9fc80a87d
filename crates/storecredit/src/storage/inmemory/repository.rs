//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use storecredit_core::auth::{AuthError, Session, SessionId, SessionRepository};
use storecredit_core::credit::{
    BalanceWrite, Customer, CustomerGroup, HistoryEntry, LedgerWrite, StoreCredit,
};
use storecredit_core::custom_field::{CustomField, CustomFieldSet, CustomFieldSetRelation};
use storecredit_core::state_machine::{
    StateHistoryEntry, StateMachine, StateMachineState, StateMachineTransition,
    ORDER_RETURN_STATE_MACHINE,
};
use storecredit_core::storage::{
    CustomFieldRepository, CustomerRepository, HistoryRepository, RepositoryError, Result,
    SettingsRepository, StateMachineRepository, StoreCreditRepository,
};

/// Balance rows and their history live behind one lock so a ledger commit is
/// a single critical section.
#[derive(Debug, Default)]
struct Ledger {
    store_credits: HashMap<Uuid, StoreCredit>,
    history: HashMap<Uuid, HistoryEntry>,
}

#[derive(Debug, Default)]
struct StateMachines {
    machines: HashMap<Uuid, StateMachine>,
    states: HashMap<Uuid, StateMachineState>,
    transitions: HashMap<Uuid, StateMachineTransition>,
    history: HashMap<Uuid, StateHistoryEntry>,
}

#[derive(Debug, Default)]
struct CustomFields {
    sets: HashMap<Uuid, CustomFieldSet>,
    fields: HashMap<Uuid, CustomField>,
    relations: HashMap<Uuid, CustomFieldSetRelation>,
}

/// In-memory storage backend.
///
/// Data is not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    ledger: Arc<RwLock<Ledger>>,
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
    groups: Arc<RwLock<HashMap<Uuid, CustomerGroup>>>,
    settings: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    state_machines: Arc<RwLock<StateMachines>>,
    custom_fields: Arc<RwLock<CustomFields>>,
    custom_fields_available: bool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(RwLock::new(Ledger::default())),
            customers: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            state_machines: Arc::new(RwLock::new(StateMachines::default())),
            custom_fields: Arc::new(RwLock::new(CustomFields::default())),
            custom_fields_available: true,
        }
    }

    /// Creates a repository pre-populated with the host's order return
    /// state machine and its `open`/`done` states.
    pub fn with_host_defaults() -> Self {
        let machine = StateMachine::new(ORDER_RETURN_STATE_MACHINE, "Return state");
        let open = StateMachineState::new(machine.id, "open", "Open");
        let done = StateMachineState::new(machine.id, "done", "Done");
        let complete = StateMachineTransition {
            id: Uuid::new_v4(),
            state_machine_id: machine.id,
            action_name: "complete".to_string(),
            from_state_id: open.id,
            to_state_id: done.id,
        };

        let mut sm = StateMachines::default();
        sm.states.insert(open.id, open);
        sm.states.insert(done.id, done);
        sm.transitions.insert(complete.id, complete);
        sm.machines.insert(machine.id, machine);

        Self {
            state_machines: Arc::new(RwLock::new(sm)),
            ..Self::new()
        }
    }

    /// Simulates a host without custom-field tables.
    #[cfg(test)]
    pub fn without_custom_fields(mut self) -> Self {
        self.custom_fields_available = false;
        self
    }

    /// Records a state change of a host entity.
    #[cfg(test)]
    pub async fn record_state_change(&self, entry: StateHistoryEntry) {
        self.state_machines
            .write()
            .await
            .history
            .insert(entry.id, entry);
    }

    /// Number of rows in the state-machine history.
    #[cfg(test)]
    pub async fn state_history_len(&self) -> usize {
        self.state_machines.read().await.history.len()
    }
}

fn conflict(id: Uuid) -> RepositoryError {
    RepositoryError::Conflict {
        entity_type: "StoreCredit",
        id: id.to_string(),
    }
}

#[async_trait]
impl StoreCreditRepository for InMemoryRepository {
    async fn get_store_credit(&self, id: Uuid) -> Result<Option<StoreCredit>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.store_credits.get(&id).cloned())
    }

    async fn get_store_credit_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<StoreCredit>> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .store_credits
            .values()
            .find(|c| c.customer_id == customer_id)
            .cloned())
    }

    async fn list_store_credits(&self) -> Result<Vec<StoreCredit>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.store_credits.values().cloned().collect())
    }

    async fn commit_ledger(&self, write: &LedgerWrite) -> Result<()> {
        let mut ledger = self.ledger.write().await;

        match &write.balance {
            BalanceWrite::Create(credit) => {
                if ledger
                    .store_credits
                    .values()
                    .any(|c| c.customer_id == credit.customer_id)
                {
                    return Err(conflict(credit.id));
                }
                ledger.store_credits.insert(credit.id, credit.clone());
            }
            BalanceWrite::Update {
                id,
                expected_balance,
                new_balance,
                currency_id,
                updated_at,
            } => {
                let credit = ledger
                    .store_credits
                    .get_mut(id)
                    .ok_or_else(|| conflict(*id))?;
                if credit.balance != *expected_balance {
                    return Err(conflict(*id));
                }
                credit.balance = *new_balance;
                credit.currency_id = *currency_id;
                credit.updated_at = Some(*updated_at);
            }
        }

        ledger.history.insert(write.entry.id, write.entry.clone());
        Ok(())
    }

    async fn delete_store_credit(&self, id: Uuid) -> Result<()> {
        let mut ledger = self.ledger.write().await;
        if ledger.store_credits.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "StoreCredit",
                id: id.to_string(),
            });
        }
        ledger.history.retain(|_, entry| entry.store_credit_id != id);
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn get_history(&self, store_credit_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let ledger = self.ledger.read().await;
        let mut entries: Vec<HistoryEntry> = ledger
            .history
            .values()
            .filter(|e| e.store_credit_id == store_credit_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepository {
    async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        let mut list: Vec<Customer> = customers.values().cloned().collect();
        list.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(list)
    }

    async fn get_customer_group(&self, id: Uuid) -> Result<Option<CustomerGroup>> {
        let groups = self.groups.read().await;
        Ok(groups.get(&id).cloned())
    }

    async fn upsert_customer(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn upsert_customer_group(&self, group: &CustomerGroup) -> Result<()> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id, group.clone());
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let settings = self.settings.read().await;
        Ok(settings.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn create_session(&self, session: &Session) -> std::result::Result<(), AuthError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> std::result::Result<Option<Session>, AuthError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }
}

#[async_trait]
impl StateMachineRepository for InMemoryRepository {
    async fn find_state_machine(&self, technical_name: &str) -> Result<Option<StateMachine>> {
        let sm = self.state_machines.read().await;
        Ok(sm
            .machines
            .values()
            .find(|m| m.technical_name == technical_name)
            .cloned())
    }

    async fn find_state(
        &self,
        state_machine_id: Uuid,
        technical_name: &str,
    ) -> Result<Option<StateMachineState>> {
        let sm = self.state_machines.read().await;
        Ok(sm
            .states
            .values()
            .find(|s| s.state_machine_id == state_machine_id && s.technical_name == technical_name)
            .cloned())
    }

    async fn create_state(&self, state: &StateMachineState) -> Result<()> {
        let mut sm = self.state_machines.write().await;
        if sm.states.values().any(|s| {
            s.state_machine_id == state.state_machine_id && s.technical_name == state.technical_name
        }) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "StateMachineState",
                id: state.technical_name.clone(),
            });
        }
        sm.states.insert(state.id, state.clone());
        Ok(())
    }

    async fn delete_state(&self, id: Uuid) -> Result<()> {
        let mut sm = self.state_machines.write().await;
        if sm.states.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "StateMachineState",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_transitions(
        &self,
        state_machine_id: Uuid,
    ) -> Result<Vec<StateMachineTransition>> {
        let sm = self.state_machines.read().await;
        Ok(sm
            .transitions
            .values()
            .filter(|t| t.state_machine_id == state_machine_id)
            .cloned()
            .collect())
    }

    async fn create_transition(&self, transition: &StateMachineTransition) -> Result<()> {
        let mut sm = self.state_machines.write().await;
        sm.transitions.insert(transition.id, transition.clone());
        Ok(())
    }

    async fn delete_transitions(&self, ids: &[Uuid]) -> Result<()> {
        let mut sm = self.state_machines.write().await;
        sm.transitions.retain(|id, _| !ids.contains(id));
        Ok(())
    }

    async fn find_history_referencing(&self, state_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let sm = self.state_machines.read().await;
        Ok(sm
            .history
            .values()
            .filter(|h| state_ids.contains(&h.from_state_id) || state_ids.contains(&h.to_state_id))
            .map(|h| h.id)
            .collect())
    }

    async fn delete_history(&self, ids: &[Uuid]) -> Result<()> {
        let mut sm = self.state_machines.write().await;
        sm.history.retain(|id, _| !ids.contains(id));
        Ok(())
    }
}

#[async_trait]
impl CustomFieldRepository for InMemoryRepository {
    async fn custom_fields_available(&self) -> Result<bool> {
        Ok(self.custom_fields_available)
    }

    async fn find_set(&self, name: &str) -> Result<Option<CustomFieldSet>> {
        let cf = self.custom_fields.read().await;
        Ok(cf.sets.values().find(|s| s.name == name).cloned())
    }

    async fn create_set(&self, set: &CustomFieldSet) -> Result<()> {
        let mut cf = self.custom_fields.write().await;
        if cf.sets.values().any(|s| s.name == set.name) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "CustomFieldSet",
                id: set.name.clone(),
            });
        }
        cf.sets.insert(set.id, set.clone());
        Ok(())
    }

    async fn find_field(&self, name: &str) -> Result<Option<CustomField>> {
        let cf = self.custom_fields.read().await;
        Ok(cf.fields.values().find(|f| f.name == name).cloned())
    }

    async fn create_field(&self, field: &CustomField) -> Result<()> {
        let mut cf = self.custom_fields.write().await;
        if cf.fields.values().any(|f| f.name == field.name) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "CustomField",
                id: field.name.clone(),
            });
        }
        cf.fields.insert(field.id, field.clone());
        Ok(())
    }

    async fn relation_exists(&self, set_id: Uuid, entity_name: &str) -> Result<bool> {
        let cf = self.custom_fields.read().await;
        Ok(cf
            .relations
            .values()
            .any(|r| r.set_id == set_id && r.entity_name == entity_name))
    }

    async fn create_relation(&self, relation: &CustomFieldSetRelation) -> Result<()> {
        let mut cf = self.custom_fields.write().await;
        cf.relations.insert(relation.id, relation.clone());
        Ok(())
    }

    async fn delete_relations(&self, set_id: Uuid) -> Result<u64> {
        let mut cf = self.custom_fields.write().await;
        let before = cf.relations.len();
        cf.relations.retain(|_, r| r.set_id != set_id);
        Ok((before - cf.relations.len()) as u64)
    }
}
