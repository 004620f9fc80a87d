//! Provisions the "Refund as Store Credits" return state.

use std::sync::Arc;

use storecredit_core::state_machine::{
    missing_transitions, owned_transition_ids, InstallError, InstallReport, StateMachine,
    StateMachineState, UninstallReport, OPEN_STATE, STORE_CREDIT_STATE, STORE_CREDIT_STATE_NAME,
};
use storecredit_core::storage::StateMachineRepository;

/// Adds the `store_credit` state and its transitions to the order return
/// state machine, and removes them again.
///
/// Both directions are idempotent: install creates only what is missing and
/// uninstall only removes what exists.
#[derive(Clone)]
pub struct OrderStateInstaller {
    repo: Arc<dyn StateMachineRepository>,
    state_machine_name: String,
}

impl OrderStateInstaller {
    pub fn new(repo: Arc<dyn StateMachineRepository>, state_machine_name: impl Into<String>) -> Self {
        Self {
            repo,
            state_machine_name: state_machine_name.into(),
        }
    }

    pub async fn install(&self) -> Result<InstallReport, InstallError> {
        let machine = self.state_machine().await?;
        let mut report = InstallReport::default();

        if self
            .repo
            .find_state(machine.id, STORE_CREDIT_STATE)
            .await?
            .is_none()
        {
            let state =
                StateMachineState::new(machine.id, STORE_CREDIT_STATE, STORE_CREDIT_STATE_NAME);
            self.repo.create_state(&state).await?;
            report.state_created = true;
        }

        let open = self.require_state(&machine, OPEN_STATE).await?;
        let store_credit = self.require_state(&machine, STORE_CREDIT_STATE).await?;
        let existing = self.repo.list_transitions(machine.id).await?;

        let planned = missing_transitions(machine.id, &existing, |name| {
            if name == OPEN_STATE {
                open.id
            } else {
                store_credit.id
            }
        });
        for transition in &planned {
            self.repo.create_transition(transition).await?;
            report
                .transitions_created
                .push(transition.action_name.clone());
        }

        tracing::info!(
            state_machine = %self.state_machine_name,
            state_created = report.state_created,
            transitions_created = ?report.transitions_created,
            "Store credit return state installed"
        );
        Ok(report)
    }

    pub async fn uninstall(&self) -> Result<UninstallReport, InstallError> {
        let machine = self.state_machine().await?;
        let mut report = UninstallReport::default();

        let transitions = self.repo.list_transitions(machine.id).await?;
        let owned = owned_transition_ids(machine.id, &transitions);
        if !owned.is_empty() {
            self.repo.delete_transitions(&owned).await?;
            report.transitions_removed = owned.len();
        }

        if let Some(state) = self.repo.find_state(machine.id, STORE_CREDIT_STATE).await? {
            let history = self.repo.find_history_referencing(&[state.id]).await?;
            if !history.is_empty() {
                self.repo.delete_history(&history).await?;
                report.history_removed = history.len();
            }
            self.repo.delete_state(state.id).await?;
            report.states_removed = 1;
        }

        tracing::info!(
            state_machine = %self.state_machine_name,
            transitions_removed = report.transitions_removed,
            history_removed = report.history_removed,
            states_removed = report.states_removed,
            "Store credit return state removed"
        );
        Ok(report)
    }

    async fn state_machine(&self) -> Result<StateMachine, InstallError> {
        self.repo
            .find_state_machine(&self.state_machine_name)
            .await?
            .ok_or_else(|| InstallError::StateMachineNotFound(self.state_machine_name.clone()))
    }

    async fn require_state(
        &self,
        machine: &StateMachine,
        technical_name: &str,
    ) -> Result<StateMachineState, InstallError> {
        self.repo
            .find_state(machine.id, technical_name)
            .await?
            .ok_or_else(|| InstallError::StateNotFound {
                technical_name: technical_name.to_string(),
                state_machine_id: machine.id,
            })
    }
}
