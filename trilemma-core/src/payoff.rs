//! Payoff table for the three-player dilemma
//!
//! The game reduces to the two-player dilemma whenever one opponent's action
//! is fixed, and payoffs depend only on the player's own action and the
//! multiset of opponent actions. That leaves a single ordering:
//!
//! `DCC > CCC > DDC > CDC > DDD > CDD`
//!
//! where the first letter is the player's own action.

use crate::action::Action;

/// Payoff table indexed by `[self][opponent 1][opponent 2]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayoffTable {
    table: [[[f64; 2]; 2]; 2],
}

/// The reference payoffs
pub const PAYOFF_TABLE: PayoffTable = PayoffTable {
    table: [
        // self cooperates
        [[6.0, 3.0], [3.0, 0.0]],
        // self defects
        [[8.0, 5.0], [5.0, 2.0]],
    ],
};

impl PayoffTable {
    /// Build a table from raw values, `table[self][opp1][opp2]`
    pub const fn new(table: [[[f64; 2]; 2]; 2]) -> Self {
        Self { table }
    }

    /// Reward for the player whose action is `own`
    #[inline]
    pub fn payoff(&self, own: Action, opp1: Action, opp2: Action) -> f64 {
        self.table[own.index()][opp1.index()][opp2.index()]
    }

    /// R: everyone cooperates
    pub fn reward(&self) -> f64 {
        self.payoff(Action::Cooperate, Action::Cooperate, Action::Cooperate)
    }

    /// P: everyone defects
    pub fn punishment(&self) -> f64 {
        self.payoff(Action::Defect, Action::Defect, Action::Defect)
    }

    /// T: lone defector among cooperators
    pub fn temptation(&self) -> f64 {
        self.payoff(Action::Defect, Action::Cooperate, Action::Cooperate)
    }

    /// S: lone cooperator among defectors
    pub fn sucker(&self) -> f64 {
        self.payoff(Action::Cooperate, Action::Defect, Action::Defect)
    }

    /// Largest forgiveness probability that keeps generous tit-for-tat stable:
    /// `min(1 - (T - R) / (R - S), (R - P) / (T - P))`
    pub fn generous_forgiveness(&self) -> f64 {
        let (r, p, t, s) = (self.reward(), self.punishment(), self.temptation(), self.sucker());
        let a = 1.0 - (t - r) / (r - s);
        let b = (r - p) / (t - p);
        a.min(b)
    }

    /// Whether the payoff depends only on the multiset of opponent actions
    pub fn is_symmetric(&self) -> bool {
        Action::ALL.iter().all(|&own| {
            self.payoff(own, Action::Cooperate, Action::Defect)
                == self.payoff(own, Action::Defect, Action::Cooperate)
        })
    }

    /// Whether the six distinct outcomes follow the dilemma ordering
    pub fn is_dilemma(&self) -> bool {
        use Action::{Cooperate as C, Defect as D};
        let ordered = [
            self.payoff(D, C, C),
            self.payoff(C, C, C),
            self.payoff(D, D, C),
            self.payoff(C, D, C),
            self.payoff(D, D, D),
            self.payoff(C, D, D),
        ];
        self.is_symmetric() && ordered.windows(2).all(|w| w[0] > w[1])
    }
}

impl Default for PayoffTable {
    fn default() -> Self {
        PAYOFF_TABLE
    }
}

/// Reward from the reference table
#[inline]
pub fn payoff(own: Action, opp1: Action, opp2: Action) -> f64 {
    PAYOFF_TABLE.payoff(own, opp1, opp2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{Cooperate as C, Defect as D};

    #[test]
    fn test_reference_values() {
        assert_eq!(payoff(D, C, C), 8.0);
        assert_eq!(payoff(C, C, C), 6.0);
        assert_eq!(payoff(D, D, C), 5.0);
        assert_eq!(payoff(C, D, C), 3.0);
        assert_eq!(payoff(D, D, D), 2.0);
        assert_eq!(payoff(C, D, D), 0.0);
    }

    #[test]
    fn test_ordering() {
        assert!(PAYOFF_TABLE.is_dilemma());
        assert!(payoff(D, C, C) > payoff(C, C, C));
        assert!(payoff(C, C, C) > payoff(D, D, C));
        assert!(payoff(D, D, C) > payoff(C, D, C));
        assert!(payoff(C, D, C) > payoff(D, D, D));
        assert!(payoff(D, D, D) > payoff(C, D, D));
    }

    #[test]
    fn test_opponent_permutation_invariance() {
        for &a in &Action::ALL {
            for &b in &Action::ALL {
                for &c in &Action::ALL {
                    assert_eq!(payoff(a, b, c), payoff(a, c, b), "({:?},{:?},{:?})", a, b, c);
                }
            }
        }
    }

    #[test]
    fn test_named_constants() {
        assert_eq!(PAYOFF_TABLE.reward(), 6.0);
        assert_eq!(PAYOFF_TABLE.punishment(), 2.0);
        assert_eq!(PAYOFF_TABLE.temptation(), 8.0);
        assert_eq!(PAYOFF_TABLE.sucker(), 0.0);
    }

    #[test]
    fn test_generous_forgiveness_is_two_thirds() {
        // min(1 - 2/6, 4/6)
        let g = PAYOFF_TABLE.generous_forgiveness();
        assert!((g - 2.0 / 3.0).abs() < 1e-12, "forgiveness was {}", g);
    }

    #[test]
    fn test_asymmetric_table_detected() {
        let broken = PayoffTable::new([[[6.0, 3.0], [4.0, 0.0]], [[8.0, 5.0], [5.0, 2.0]]]);
        assert!(!broken.is_symmetric());
        assert!(!broken.is_dilemma());
    }
}
