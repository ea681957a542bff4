//! Player input actions and their bindings
//!
//! Bindings are tied to the agent's activation: bound when the run
//! controller activates, unbound when it deactivates, so no action can
//! reach an agent that has left the simulation.

use serde::{Deserialize, Serialize};

/// A discrete player action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputAction {
    /// Turn axis value; negative is left, positive is right
    Turn(f32),
    Jump,
    Slide,
}

/// Which action kind an [`InputAction`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Turn,
    Jump,
    Slide,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Turn, ActionKind::Jump, ActionKind::Slide];

    fn bit(self) -> u8 {
        match self {
            ActionKind::Turn => 1,
            ActionKind::Jump => 1 << 1,
            ActionKind::Slide => 1 << 2,
        }
    }
}

impl InputAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            InputAction::Turn(_) => ActionKind::Turn,
            InputAction::Jump => ActionKind::Jump,
            InputAction::Slide => ActionKind::Slide,
        }
    }
}

/// Read a turn axis as -1, 0 or +1
///
/// Zero (dead zone) means no turn was requested.
pub fn turn_value(axis: f32) -> i32 {
    if axis >= 0.5 {
        1
    } else if axis <= -0.5 {
        -1
    } else {
        0
    }
}

/// Set of currently bound action kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionBindings(u8);

impl ActionBindings {
    pub fn subscribe(&mut self, kind: ActionKind) {
        self.0 |= kind.bit();
    }

    pub fn unsubscribe(&mut self, kind: ActionKind) {
        self.0 &= !kind.bit();
    }

    pub fn subscribe_all(&mut self) {
        for kind in ActionKind::ALL {
            self.subscribe(kind);
        }
    }

    pub fn unsubscribe_all(&mut self) {
        for kind in ActionKind::ALL {
            self.unsubscribe(kind);
        }
    }

    pub fn is_bound(&self, kind: ActionKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_value_dead_zone() {
        assert_eq!(turn_value(1.0), 1);
        assert_eq!(turn_value(-1.0), -1);
        assert_eq!(turn_value(0.0), 0);
        assert_eq!(turn_value(0.2), 0);
    }

    #[test]
    fn test_subscribe_unsubscribe_pairing() {
        let mut bindings = ActionBindings::default();
        assert!(bindings.is_empty());

        bindings.subscribe_all();
        for kind in ActionKind::ALL {
            assert!(bindings.is_bound(kind));
        }

        bindings.unsubscribe(ActionKind::Jump);
        assert!(!bindings.is_bound(ActionKind::Jump));
        assert!(bindings.is_bound(ActionKind::Slide));

        bindings.unsubscribe_all();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_action_kind() {
        assert_eq!(InputAction::Turn(-1.0).kind(), ActionKind::Turn);
        assert_eq!(InputAction::Slide.kind(), ActionKind::Slide);
    }
}
