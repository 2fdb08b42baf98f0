//! Match play - one three-player match of N rounds
//!
//! Level 3 - Step-level implementation

use rand::Rng;
use trilemma_core::{payoff, Action, MatchHistory, Player, Seat};

use crate::error::{Result, TournamentError};

/// Result of a single match
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Average payoff per round for seats A, B, C
    pub scores: [f64; 3],
    /// Rounds played
    pub rounds: u32,
    /// Every action taken, by seat
    pub history: MatchHistory,
}

impl MatchResult {
    /// Average score of one seat
    pub fn score(&self, seat: Seat) -> f64 {
        self.scores[seat.index()]
    }
}

/// Run one match between three fresh players.
///
/// Players are consumed: any per-match state ends with the match.
///
/// # Arguments
/// * `a`, `b`, `c` - Players in seats A, B and C
/// * `rounds` - Number of rounds (must be positive)
/// * `rng` - Random source for stochastic strategies
///
/// # Returns
/// Average payoff per round for each seat
pub fn run_match<R: Rng + ?Sized>(
    a: Player,
    b: Player,
    c: Player,
    rounds: u32,
    rng: &mut R,
) -> Result<MatchResult> {
    if rounds == 0 {
        return Err(TournamentError::ZeroRounds);
    }

    let mut players = [a, b, c];
    let mut history = MatchHistory::with_capacity(rounds as usize);
    let mut sums = [0.0f64; 3];

    for round in 0..rounds as usize {
        // Decisions only see the history as it stood before this round
        let actions = collect_actions(&mut players, &history, round, rng);

        for seat in Seat::ALL {
            sums[seat.index()] += seat_payoff(seat, &actions);
        }

        history.push(actions);
    }

    let scores = sums.map(|sum| sum / rounds as f64);

    Ok(MatchResult {
        scores,
        rounds,
        history,
    })
}

/// Query every seat for its action this round
fn collect_actions<R: Rng + ?Sized>(
    players: &mut [Player; 3],
    history: &MatchHistory,
    round: usize,
    rng: &mut R,
) -> [Action; 3] {
    let mut actions = [Action::Cooperate; 3];
    for seat in Seat::ALL {
        let view = history.view(seat);
        actions[seat.index()] =
            players[seat.index()].decide(round, view.own, view.opponent1, view.opponent2, rng);
    }
    actions
}

/// Payoff for `seat`, rotated the same way the seat perceives its opponents
fn seat_payoff(seat: Seat, actions: &[Action; 3]) -> f64 {
    let (first, second) = seat.opponents();
    payoff(
        actions[seat.index()],
        actions[first.index()],
        actions[second.index()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use trilemma_core::StrategyKind;
    use Action::{Cooperate as C, Defect as D};

    fn play(kinds: [StrategyKind; 3], rounds: u32, seed: u64) -> MatchResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let [a, b, c] = kinds.map(|k| Player::new(k, &mut rng));
        run_match(a, b, c, rounds, &mut rng).unwrap()
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = || Player::new(StrategyKind::AlwaysCooperate, &mut ChaCha8Rng::seed_from_u64(0));
        let result = run_match(p(), p(), p(), 0, &mut rng);
        assert!(matches!(result, Err(TournamentError::ZeroRounds)));
    }

    #[test]
    fn test_all_cooperate() {
        for rounds in [1, 7, 90, 110] {
            let result = play([StrategyKind::AlwaysCooperate; 3], rounds, 42);
            assert_eq!(result.scores, [6.0, 6.0, 6.0]);
            assert_eq!(result.rounds, rounds);
        }
    }

    #[test]
    fn test_all_defect() {
        for rounds in [1, 13, 100] {
            let result = play([StrategyKind::AlwaysDefect; 3], rounds, 42);
            assert_eq!(result.scores, [2.0, 2.0, 2.0]);
        }
    }

    #[test]
    fn test_lone_defector() {
        let result = play(
            [
                StrategyKind::AlwaysDefect,
                StrategyKind::AlwaysCooperate,
                StrategyKind::AlwaysCooperate,
            ],
            10,
            42,
        );
        assert_eq!(result.scores, [8.0, 3.0, 3.0]);
    }

    #[test]
    fn test_seat_rotation_attributes_payoffs() {
        // Same lineup in every seat order gives the same per-strategy payoff
        let d = StrategyKind::AlwaysDefect;
        let c = StrategyKind::AlwaysCooperate;
        assert_eq!(play([c, d, c], 5, 1).scores, [3.0, 8.0, 3.0]);
        assert_eq!(play([c, c, d], 5, 1).scores, [3.0, 3.0, 8.0]);
        assert_eq!(play([d, d, c], 5, 1).scores, [5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_standard_tit_for_tat_with_cooperators() {
        let result = play(
            [
                StrategyKind::StandardTitForTat,
                StrategyKind::AlwaysCooperate,
                StrategyKind::AlwaysCooperate,
            ],
            100,
            42,
        );
        assert!(result.history.iter_rounds().all(|r| r == [C, C, C]));
        assert_eq!(result.scores, [6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_trigger_against_defector_and_cooperator() {
        let result = play(
            [
                StrategyKind::Trigger,
                StrategyKind::AlwaysDefect,
                StrategyKind::AlwaysCooperate,
            ],
            20,
            42,
        );
        let trigger = result.history.actions(Seat::A);
        assert_eq!(trigger[0], C);
        assert!(trigger[1..].iter().all(|&a| a == D));
        assert_eq!(result.history.actions(Seat::B)[0], D);
    }

    #[test]
    fn test_histories_have_round_count_length() {
        let result = play(
            [StrategyKind::Random, StrategyKind::Pavlov, StrategyKind::Tester],
            37,
            9,
        );
        assert_eq!(result.history.rounds(), 37);
        for seat in Seat::ALL {
            assert_eq!(result.history.actions(seat).len(), 37);
        }
    }

    #[test]
    fn test_scores_are_mean_of_round_payoffs() {
        let result = play(
            [StrategyKind::Random, StrategyKind::Joss, StrategyKind::Freaky],
            50,
            3,
        );
        for seat in Seat::ALL {
            let sum: f64 = result
                .history
                .iter_rounds()
                .map(|actions| seat_payoff(seat, &actions))
                .sum();
            assert!((result.score(seat) - sum / 50.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_match_determinism() {
        let kinds = [
            StrategyKind::Random,
            StrategyKind::GenerousTitForTat,
            StrategyKind::TitForTat,
        ];
        let r1 = play(kinds, 100, 1234);
        let r2 = play(kinds, 100, 1234);
        assert_eq!(r1.scores, r2.scores);
        assert_eq!(r1.history, r2.history);
    }

    #[test]
    fn test_pavlov_self_play_stays_cooperative() {
        let result = play([StrategyKind::Pavlov; 3], 30, 0);
        assert_eq!(result.scores, [6.0, 6.0, 6.0]);
    }
}
