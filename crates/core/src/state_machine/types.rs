use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A host state machine, e.g. the order return workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachine {
    pub id: Uuid,
    pub technical_name: String,
    pub name: String,
}

impl StateMachine {
    pub fn new(technical_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            technical_name: technical_name.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineState {
    pub id: Uuid,
    pub state_machine_id: Uuid,
    pub technical_name: String,
    pub name: String,
}

impl StateMachineState {
    pub fn new(
        state_machine_id: Uuid,
        technical_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state_machine_id,
            technical_name: technical_name.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineTransition {
    pub id: Uuid,
    pub state_machine_id: Uuid,
    pub action_name: String,
    pub from_state_id: Uuid,
    pub to_state_id: Uuid,
}

/// A recorded state change of some host entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateHistoryEntry {
    pub id: Uuid,
    pub state_machine_id: Uuid,
    pub entity_id: Uuid,
    pub from_state_id: Uuid,
    pub to_state_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// What an install run created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReport {
    pub state_created: bool,
    pub transitions_created: Vec<String>,
}

impl InstallReport {
    pub fn is_noop(&self) -> bool {
        !self.state_created && self.transitions_created.is_empty()
    }
}

/// What an uninstall run removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallReport {
    pub transitions_removed: usize,
    pub history_removed: usize,
    pub states_removed: usize,
}
