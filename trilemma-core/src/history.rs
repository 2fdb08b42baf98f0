//! Match history - append-only action record for the three seats

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Seat within a three-player match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
    C,
}

impl Seat {
    pub const ALL: [Seat; 3] = [Seat::A, Seat::B, Seat::C];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
            Seat::C => 2,
        }
    }

    /// The two opponents in the order this seat perceives them.
    /// A sees (B, C), B sees (C, A), C sees (A, B).
    #[inline]
    pub fn opponents(self) -> (Seat, Seat) {
        match self {
            Seat::A => (Seat::B, Seat::C),
            Seat::B => (Seat::C, Seat::A),
            Seat::C => (Seat::A, Seat::B),
        }
    }
}

/// One seat's view of the match so far
#[derive(Clone, Copy, Debug)]
pub struct SeatView<'a> {
    pub own: &'a [Action],
    pub opponent1: &'a [Action],
    pub opponent2: &'a [Action],
}

/// Actions taken by each seat, indexed by round
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHistory {
    seats: [Vec<Action>; 3],
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known round count
    pub fn with_capacity(rounds: usize) -> Self {
        Self {
            seats: [
                Vec::with_capacity(rounds),
                Vec::with_capacity(rounds),
                Vec::with_capacity(rounds),
            ],
        }
    }

    /// Number of completed rounds
    pub fn rounds(&self) -> usize {
        self.seats[0].len()
    }

    /// Append one round
    pub fn push(&mut self, actions: [Action; 3]) {
        for (seat, action) in self.seats.iter_mut().zip(actions) {
            seat.push(action);
        }
    }

    /// Actions of a single seat
    pub fn actions(&self, seat: Seat) -> &[Action] {
        &self.seats[seat.index()]
    }

    /// History as seen from `seat`: its own actions, then its opponents
    pub fn view(&self, seat: Seat) -> SeatView<'_> {
        let (first, second) = seat.opponents();
        SeatView {
            own: self.actions(seat),
            opponent1: self.actions(first),
            opponent2: self.actions(second),
        }
    }

    /// Actions of round `round` as (A, B, C)
    pub fn round(&self, round: usize) -> Option<[Action; 3]> {
        Some([
            *self.seats[0].get(round)?,
            *self.seats[1].get(round)?,
            *self.seats[2].get(round)?,
        ])
    }

    /// Iterate rounds in order
    pub fn iter_rounds(&self) -> impl Iterator<Item = [Action; 3]> + '_ {
        (0..self.rounds()).filter_map(move |r| self.round(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{Cooperate as C, Defect as D};

    #[test]
    fn test_rotation() {
        assert_eq!(Seat::A.opponents(), (Seat::B, Seat::C));
        assert_eq!(Seat::B.opponents(), (Seat::C, Seat::A));
        assert_eq!(Seat::C.opponents(), (Seat::A, Seat::B));
    }

    #[test]
    fn test_push_and_view() {
        let mut history = MatchHistory::new();
        history.push([C, D, D]);
        history.push([D, C, D]);

        assert_eq!(history.rounds(), 2);

        let b = history.view(Seat::B);
        assert_eq!(b.own, &[D, C]);
        assert_eq!(b.opponent1, &[D, D]);
        assert_eq!(b.opponent2, &[C, D]);

        let c = history.view(Seat::C);
        assert_eq!(c.own, &[D, D]);
        assert_eq!(c.opponent1, &[C, D]);
        assert_eq!(c.opponent2, &[D, C]);
    }

    #[test]
    fn test_round_access() {
        let mut history = MatchHistory::with_capacity(4);
        history.push([C, C, D]);
        assert_eq!(history.round(0), Some([C, C, D]));
        assert_eq!(history.round(1), None);
        assert_eq!(history.iter_rounds().count(), 1);
    }
}
