mod error;
mod transitions;
mod types;

pub use error::InstallError;
pub use transitions::{
    missing_transitions, owned_transition_ids, transition_action_names, TransitionDefinition,
    MARK_AS_OPEN, MARK_AS_STORE_CREDIT, OPEN_STATE, ORDER_RETURN_STATE_MACHINE,
    STORE_CREDIT_STATE, STORE_CREDIT_STATE_NAME, TRANSITIONS,
};
pub use types::{
    InstallReport, StateHistoryEntry, StateMachine, StateMachineState, StateMachineTransition,
    UninstallReport,
};
