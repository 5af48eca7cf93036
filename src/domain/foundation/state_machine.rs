//! Validated transitions for lifecycle status enums.

use super::ValidationError;

/// A status enum whose legal moves are listed per state.
///
/// `transition_to` refuses anything `valid_transitions` does not list, so
/// callers can log and ignore illegal moves instead of corrupting state.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Whether `target` is reachable in one step.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// States reachable in one step from this one.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns `target` when reachable, otherwise an `InvalidTransition` error.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    impl StateMachine for Door {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Door::Closed => vec![Door::Open, Door::Locked],
                Door::Open => vec![Door::Closed],
                Door::Locked => vec![Door::Closed],
            }
        }
    }

    #[test]
    fn listed_move_is_allowed() {
        assert_eq!(Door::Closed.transition_to(Door::Locked), Ok(Door::Locked));
    }

    #[test]
    fn unlisted_move_is_refused() {
        assert_eq!(
            Door::Open.transition_to(Door::Locked),
            Err(ValidationError::InvalidTransition {
                from: "Open".into(),
                to: "Locked".into(),
            })
        );
    }
}
