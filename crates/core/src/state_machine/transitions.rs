//! The return-state transitions and pure planning over them.

use uuid::Uuid;

use super::types::StateMachineTransition;

/// Technical name of the host's order return state machine.
pub const ORDER_RETURN_STATE_MACHINE: &str = "order_return.state";

/// Technical name of the state this plugin adds.
pub const STORE_CREDIT_STATE: &str = "store_credit";

/// Display name of [`STORE_CREDIT_STATE`].
pub const STORE_CREDIT_STATE_NAME: &str = "Refund as Store Credits";

/// Technical name of the host's initial return state.
pub const OPEN_STATE: &str = "open";

pub const MARK_AS_STORE_CREDIT: &str = "mark_as_store_credit";
pub const MARK_AS_OPEN: &str = "mark_as_open";

/// A transition by state technical names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDefinition {
    pub action_name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

/// Transitions provisioned on install and removed on uninstall.
pub const TRANSITIONS: [TransitionDefinition; 2] = [
    TransitionDefinition {
        action_name: MARK_AS_STORE_CREDIT,
        from: OPEN_STATE,
        to: STORE_CREDIT_STATE,
    },
    TransitionDefinition {
        action_name: MARK_AS_OPEN,
        from: STORE_CREDIT_STATE,
        to: OPEN_STATE,
    },
];

/// Action names of [`TRANSITIONS`].
pub fn transition_action_names() -> Vec<&'static str> {
    TRANSITIONS.iter().map(|t| t.action_name).collect()
}

/// Builds the transitions that do not exist yet.
///
/// A transition counts as existing when the machine already has one with the
/// same action name. `resolve` maps a state technical name to its ID.
pub fn missing_transitions(
    state_machine_id: Uuid,
    existing: &[StateMachineTransition],
    resolve: impl Fn(&str) -> Uuid,
) -> Vec<StateMachineTransition> {
    TRANSITIONS
        .iter()
        .filter(|def| {
            !existing
                .iter()
                .any(|t| t.state_machine_id == state_machine_id && t.action_name == def.action_name)
        })
        .map(|def| StateMachineTransition {
            id: Uuid::new_v4(),
            state_machine_id,
            action_name: def.action_name.to_string(),
            from_state_id: resolve(def.from),
            to_state_id: resolve(def.to),
        })
        .collect()
}

/// IDs of the machine's transitions that this plugin owns.
pub fn owned_transition_ids(
    state_machine_id: Uuid,
    transitions: &[StateMachineTransition],
) -> Vec<Uuid> {
    let names = transition_action_names();
    transitions
        .iter()
        .filter(|t| t.state_machine_id == state_machine_id && names.contains(&t.action_name.as_str()))
        .map(|t| t.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACHINE: Uuid = Uuid::from_u128(1);
    const OPEN: Uuid = Uuid::from_u128(10);
    const CREDIT: Uuid = Uuid::from_u128(11);

    fn resolve(name: &str) -> Uuid {
        match name {
            OPEN_STATE => OPEN,
            STORE_CREDIT_STATE => CREDIT,
            other => panic!("unexpected state {other}"),
        }
    }

    fn transition(machine: Uuid, action: &str) -> StateMachineTransition {
        StateMachineTransition {
            id: Uuid::new_v4(),
            state_machine_id: machine,
            action_name: action.to_string(),
            from_state_id: OPEN,
            to_state_id: CREDIT,
        }
    }

    #[test]
    fn test_all_transitions_missing_on_fresh_machine() {
        let planned = missing_transitions(MACHINE, &[], resolve);
        assert_eq!(planned.len(), 2);

        let to_credit = &planned[0];
        assert_eq!(to_credit.action_name, MARK_AS_STORE_CREDIT);
        assert_eq!(to_credit.from_state_id, OPEN);
        assert_eq!(to_credit.to_state_id, CREDIT);

        let to_open = &planned[1];
        assert_eq!(to_open.action_name, MARK_AS_OPEN);
        assert_eq!(to_open.from_state_id, CREDIT);
        assert_eq!(to_open.to_state_id, OPEN);
    }

    #[test]
    fn test_existing_action_is_not_planned_again() {
        let existing = vec![transition(MACHINE, MARK_AS_STORE_CREDIT)];
        let planned = missing_transitions(MACHINE, &existing, resolve);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].action_name, MARK_AS_OPEN);
    }

    #[test]
    fn test_other_machine_transitions_are_ignored() {
        let existing = vec![
            transition(Uuid::from_u128(2), MARK_AS_STORE_CREDIT),
            transition(Uuid::from_u128(2), MARK_AS_OPEN),
        ];
        assert_eq!(missing_transitions(MACHINE, &existing, resolve).len(), 2);
        assert!(owned_transition_ids(MACHINE, &existing).is_empty());
    }

    #[test]
    fn test_owned_transition_ids_skip_host_transitions() {
        let owned = transition(MACHINE, MARK_AS_OPEN);
        let host = transition(MACHINE, "reopen");
        let ids = owned_transition_ids(MACHINE, &[owned.clone(), host]);
        assert_eq!(ids, vec![owned.id]);
    }
}
