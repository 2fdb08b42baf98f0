//! Action - a single-round choice

use serde::{Deserialize, Serialize};

/// A player's choice in one round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Cooperate,
    Defect,
}

impl Action {
    /// Both actions, in table order (Cooperate = 0, Defect = 1)
    pub const ALL: [Action; 2] = [Action::Cooperate, Action::Defect];

    /// Table index (Cooperate = 0, Defect = 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Cooperate => 0,
            Action::Defect => 1,
        }
    }

    /// The other action
    #[inline]
    pub fn opposite(self) -> Action {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }

    #[inline]
    pub fn is_defect(self) -> bool {
        self == Action::Defect
    }
}
