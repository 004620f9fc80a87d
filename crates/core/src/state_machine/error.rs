use thiserror::Error;
use uuid::Uuid;

use crate::storage::RepositoryError;

/// Failures while provisioning or removing the store-credit return state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("State machine \"{0}\" not found")]
    StateMachineNotFound(String),
    #[error("State \"{technical_name}\" not found in state machine \"{state_machine_id}\"")]
    StateNotFound {
        technical_name: String,
        state_machine_id: Uuid,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_error_display() {
        assert_eq!(
            InstallError::StateMachineNotFound("order_return.state".into()).to_string(),
            "State machine \"order_return.state\" not found"
        );
        let err = InstallError::StateNotFound {
            technical_name: "open".into(),
            state_machine_id: Uuid::nil(),
        };
        assert_eq!(
            err.to_string(),
            format!("State \"open\" not found in state machine \"{}\"", Uuid::nil())
        );
    }
}
