//! Strategy definitions and per-match players
//!
//! `StrategyKind` is the closed set of registered behaviours. A `Player` is
//! one strategy instance for the duration of a single match: it owns any
//! private state the strategy needs and is dropped when the match ends.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::payoff::PAYOFF_TABLE;

/// Round from which the end-game defector stops cooperating
pub const END_GAME_ROUND: usize = 100;

/// Tester defects on rounds divisible by this when unpunished
pub const TESTER_PERIOD: usize = 5;

/// Joss defects against cooperators with this probability
pub const JOSS_DEFECT_PROBABILITY: f64 = 0.1;

/// Pavlov repeats its last action when it earned at least this much
pub const PAVLOV_WIN_THRESHOLD: f64 = 5.0;

/// Registered strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Always cooperate.
    AlwaysCooperate,
    /// Always defect.
    AlwaysDefect,
    /// Fair coin each round.
    Random,
    /// Defect only while opponents have defected more often than cooperated.
    Tolerant,
    /// Flip a coin once per match and stick with it.
    Freaky,
    /// Copy the last move of a randomly chosen opponent. Start with cooperate.
    TitForTat,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Defect if either opponent defected last round. Start with cooperate.
    StandardTitForTat,
    /// Standard Tit-for-Tat but start with defect.
    SuspiciousStandardTitForTat,
    /// Standard Tit-for-Tat that sometimes forgives.
    GenerousTitForTat,
    /// Standard Tit-for-Tat that sometimes defects unprovoked.
    Joss,
    /// Defect only if one opponent defected in each of the last two rounds.
    TitForTwoTats,
    /// Defect only if one opponent defected in each of the last three rounds.
    TitForThreeTats,
    /// Defect only if one opponent defected in each of the last four rounds.
    TitForFourTats,
    /// Probe with a defection, exploit if nobody retaliates.
    Tester,
    /// Win-stay, lose-shift.
    Pavlov,
    /// Cooperate until anyone defects, then defect forever.
    Trigger,
    /// Standard Tit-for-Tat, then defect from round 100 on.
    EndGameDefector,
}

impl StrategyKind {
    /// Every strategy, in standard roster order
    pub const ALL: [StrategyKind; 18] = [
        StrategyKind::AlwaysCooperate,
        StrategyKind::AlwaysDefect,
        StrategyKind::Random,
        StrategyKind::Tolerant,
        StrategyKind::Freaky,
        StrategyKind::TitForTat,
        StrategyKind::SuspiciousTitForTat,
        StrategyKind::StandardTitForTat,
        StrategyKind::SuspiciousStandardTitForTat,
        StrategyKind::GenerousTitForTat,
        StrategyKind::Joss,
        StrategyKind::TitForTwoTats,
        StrategyKind::TitForThreeTats,
        StrategyKind::TitForFourTats,
        StrategyKind::Tester,
        StrategyKind::Pavlov,
        StrategyKind::Trigger,
        StrategyKind::EndGameDefector,
    ];

    /// Stable tag, also the default display name
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "always-cooperate",
            StrategyKind::AlwaysDefect => "always-defect",
            StrategyKind::Random => "random",
            StrategyKind::Tolerant => "tolerant",
            StrategyKind::Freaky => "freaky",
            StrategyKind::TitForTat => "tit-for-tat",
            StrategyKind::SuspiciousTitForTat => "suspicious-tit-for-tat",
            StrategyKind::StandardTitForTat => "standard-tit-for-tat",
            StrategyKind::SuspiciousStandardTitForTat => "suspicious-standard-tit-for-tat",
            StrategyKind::GenerousTitForTat => "generous-tit-for-tat",
            StrategyKind::Joss => "joss",
            StrategyKind::TitForTwoTats => "tit-for-two-tats",
            StrategyKind::TitForThreeTats => "tit-for-three-tats",
            StrategyKind::TitForFourTats => "tit-for-four-tats",
            StrategyKind::Tester => "tester",
            StrategyKind::Pavlov => "pavlov",
            StrategyKind::Trigger => "trigger",
            StrategyKind::EndGameDefector => "end-game-defector",
        }
    }

    /// One-line description for listings
    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "always cooperates",
            StrategyKind::AlwaysDefect => "always defects",
            StrategyKind::Random => "cooperates or defects with equal probability each round",
            StrategyKind::Tolerant => "defects while opponents' defections outnumber cooperations",
            StrategyKind::Freaky => "picks one action at random for the whole match",
            StrategyKind::TitForTat => "copies a randomly chosen opponent's last move",
            StrategyKind::SuspiciousTitForTat => "tit-for-tat opening with a defection",
            StrategyKind::StandardTitForTat => "defects if either opponent defected last round",
            StrategyKind::SuspiciousStandardTitForTat => {
                "standard tit-for-tat opening with a defection"
            }
            StrategyKind::GenerousTitForTat => "standard tit-for-tat forgiving with probability 2/3",
            StrategyKind::Joss => "standard tit-for-tat with 10% unprovoked defections",
            StrategyKind::TitForTwoTats => "defects after two consecutive defections by one opponent",
            StrategyKind::TitForThreeTats => {
                "defects after three consecutive defections by one opponent"
            }
            StrategyKind::TitForFourTats => {
                "defects after four consecutive defections by one opponent"
            }
            StrategyKind::Tester => "probes with a defection, exploits every 5th round if unpunished",
            StrategyKind::Pavlov => "repeats its last move after a payoff of 5 or more, else switches",
            StrategyKind::Trigger => "cooperates until anyone defects, then defects forever",
            StrategyKind::EndGameDefector => "standard tit-for-tat, defects from round 100 on",
        }
    }

    /// Whether decisions consume random draws
    pub fn is_stochastic(self) -> bool {
        matches!(
            self,
            StrategyKind::Random
                | StrategyKind::Freaky
                | StrategyKind::TitForTat
                | StrategyKind::SuspiciousTitForTat
                | StrategyKind::GenerousTitForTat
                | StrategyKind::Joss
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strategy tag that matches no registered strategy
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Strategies whose decision depends only on the histories and the random source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    AlwaysCooperate,
    AlwaysDefect,
    Random,
    Tolerant,
    TitForTat,
    SuspiciousTitForTat,
    StandardTitForTat,
    SuspiciousStandardTitForTat,
    GenerousTitForTat,
    Joss,
    TitForTwoTats,
    TitForThreeTats,
    TitForFourTats,
    Pavlov,
    Trigger,
    EndGameDefector,
}

/// Per-match behaviour, carrying whatever private state the strategy needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Behaviour {
    Rule(Rule),
    /// Action drawn at construction
    Committed(Action),
    Tester { retaliation_detected: bool },
}

/// A strategy instance for one match
#[derive(Clone, Debug)]
pub struct Player {
    behaviour: Behaviour,
}

impl Player {
    /// Create a fresh player. Strategies that commit at construction draw from `rng`.
    pub fn new<R: Rng + ?Sized>(kind: StrategyKind, rng: &mut R) -> Self {
        let behaviour = match kind {
            StrategyKind::AlwaysCooperate => Behaviour::Rule(Rule::AlwaysCooperate),
            StrategyKind::AlwaysDefect => Behaviour::Rule(Rule::AlwaysDefect),
            StrategyKind::Random => Behaviour::Rule(Rule::Random),
            StrategyKind::Tolerant => Behaviour::Rule(Rule::Tolerant),
            StrategyKind::Freaky => Behaviour::Committed(coin_flip(rng)),
            StrategyKind::TitForTat => Behaviour::Rule(Rule::TitForTat),
            StrategyKind::SuspiciousTitForTat => Behaviour::Rule(Rule::SuspiciousTitForTat),
            StrategyKind::StandardTitForTat => Behaviour::Rule(Rule::StandardTitForTat),
            StrategyKind::SuspiciousStandardTitForTat => {
                Behaviour::Rule(Rule::SuspiciousStandardTitForTat)
            }
            StrategyKind::GenerousTitForTat => Behaviour::Rule(Rule::GenerousTitForTat),
            StrategyKind::Joss => Behaviour::Rule(Rule::Joss),
            StrategyKind::TitForTwoTats => Behaviour::Rule(Rule::TitForTwoTats),
            StrategyKind::TitForThreeTats => Behaviour::Rule(Rule::TitForThreeTats),
            StrategyKind::TitForFourTats => Behaviour::Rule(Rule::TitForFourTats),
            StrategyKind::Tester => Behaviour::Tester {
                retaliation_detected: false,
            },
            StrategyKind::Pavlov => Behaviour::Rule(Rule::Pavlov),
            StrategyKind::Trigger => Behaviour::Rule(Rule::Trigger),
            StrategyKind::EndGameDefector => Behaviour::Rule(Rule::EndGameDefector),
        };
        Self { behaviour }
    }

    /// Choose the action for round `round`.
    ///
    /// # Arguments
    /// * `round` - Completed rounds so far (0 on the first call)
    /// * `own` - This player's past actions
    /// * `opponent1`, `opponent2` - Opponents' past actions, in this player's seat order
    /// * `rng` - Random source for stochastic strategies
    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        round: usize,
        own: &[Action],
        opponent1: &[Action],
        opponent2: &[Action],
        rng: &mut R,
    ) -> Action {
        debug_assert_eq!(own.len(), round);
        debug_assert_eq!(opponent1.len(), round);
        debug_assert_eq!(opponent2.len(), round);

        match &mut self.behaviour {
            Behaviour::Rule(rule) => apply_rule(*rule, round, own, opponent1, opponent2, rng),
            Behaviour::Committed(action) => *action,
            Behaviour::Tester {
                retaliation_detected,
            } => execute_tester(round, opponent1, opponent2, retaliation_detected),
        }
    }
}

fn apply_rule<R: Rng + ?Sized>(
    rule: Rule,
    round: usize,
    own: &[Action],
    opponent1: &[Action],
    opponent2: &[Action],
    rng: &mut R,
) -> Action {
    match rule {
        Rule::AlwaysCooperate => Action::Cooperate,
        Rule::AlwaysDefect => Action::Defect,
        Rule::Random => coin_flip(rng),
        Rule::Tolerant => execute_tolerant(opponent1, opponent2),
        Rule::TitForTat => {
            execute_random_tit_for_tat(round, Action::Cooperate, opponent1, opponent2, rng)
        }
        Rule::SuspiciousTitForTat => {
            execute_random_tit_for_tat(round, Action::Defect, opponent1, opponent2, rng)
        }
        Rule::StandardTitForTat => {
            execute_standard_tit_for_tat(round, Action::Cooperate, opponent1, opponent2)
        }
        Rule::SuspiciousStandardTitForTat => {
            execute_standard_tit_for_tat(round, Action::Defect, opponent1, opponent2)
        }
        Rule::GenerousTitForTat => execute_generous_tit_for_tat(round, opponent1, opponent2, rng),
        Rule::Joss => execute_joss(round, opponent1, opponent2, rng),
        Rule::TitForTwoTats => execute_tit_for_n_tats(2, round, opponent1, opponent2),
        Rule::TitForThreeTats => execute_tit_for_n_tats(3, round, opponent1, opponent2),
        Rule::TitForFourTats => execute_tit_for_n_tats(4, round, opponent1, opponent2),
        Rule::Pavlov => execute_pavlov(own, opponent1, opponent2),
        Rule::Trigger => execute_trigger(opponent1, opponent2),
        Rule::EndGameDefector => execute_end_game_defector(round, opponent1, opponent2),
    }
}

// ============================================================================
// Strategy implementations
// ============================================================================

fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> Action {
    if rng.gen_bool(0.5) {
        Action::Cooperate
    } else {
        Action::Defect
    }
}

/// True if either opponent defected in the previous round
fn defected_last_round(opponent1: &[Action], opponent2: &[Action]) -> bool {
    opponent1.last().is_some_and(|a| a.is_defect()) || opponent2.last().is_some_and(|a| a.is_defect())
}

/// Tolerant: weigh all opponent moves so far
fn execute_tolerant(opponent1: &[Action], opponent2: &[Action]) -> Action {
    let (defections, cooperations) = opponent1
        .iter()
        .chain(opponent2)
        .fold((0usize, 0usize), |(d, c), a| if a.is_defect() { (d + 1, c) } else { (d, c + 1) });

    if defections > cooperations {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// Tit-for-Tat against one opponent picked at random each round
fn execute_random_tit_for_tat<R: Rng + ?Sized>(
    round: usize,
    opening: Action,
    opponent1: &[Action],
    opponent2: &[Action],
    rng: &mut R,
) -> Action {
    if round == 0 {
        return opening;
    }
    let target = if rng.gen_bool(0.5) { opponent1 } else { opponent2 };
    target[round - 1]
}

/// Standard Tit-for-Tat: punish any defection from the previous round
fn execute_standard_tit_for_tat(
    round: usize,
    opening: Action,
    opponent1: &[Action],
    opponent2: &[Action],
) -> Action {
    if round == 0 {
        return opening;
    }
    if defected_last_round(opponent1, opponent2) {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// Generous Tit-for-Tat: forgive a retaliation with the payoff-derived probability
fn execute_generous_tit_for_tat<R: Rng + ?Sized>(
    round: usize,
    opponent1: &[Action],
    opponent2: &[Action],
    rng: &mut R,
) -> Action {
    if round == 0 {
        return Action::Cooperate;
    }
    if defected_last_round(opponent1, opponent2) {
        if rng.gen_bool(PAYOFF_TABLE.generous_forgiveness()) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    } else {
        Action::Cooperate
    }
}

/// Joss: Standard Tit-for-Tat with occasional unprovoked defections
fn execute_joss<R: Rng + ?Sized>(
    round: usize,
    opponent1: &[Action],
    opponent2: &[Action],
    rng: &mut R,
) -> Action {
    if round == 0 {
        return Action::Cooperate;
    }
    if defected_last_round(opponent1, opponent2) {
        return Action::Defect;
    }
    if rng.gen_bool(JOSS_DEFECT_PROBABILITY) {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// Tit-for-N-Tats: one opponent must have defected in each of the last `n` rounds
fn execute_tit_for_n_tats(
    n: usize,
    round: usize,
    opponent1: &[Action],
    opponent2: &[Action],
) -> Action {
    if round < n {
        return Action::Cooperate;
    }
    let streak = |history: &[Action]| history[round - n..round].iter().all(|a| a.is_defect());
    if streak(opponent1) || streak(opponent2) {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// Tester: open with a defection; retaliation seen in round 1 switches to Standard Tit-for-Tat
fn execute_tester(
    round: usize,
    opponent1: &[Action],
    opponent2: &[Action],
    retaliation_detected: &mut bool,
) -> Action {
    if round == 0 {
        return Action::Defect;
    }

    // Only checked once, right after the probe
    if round == 1 && (opponent1[0].is_defect() || opponent2[0].is_defect()) {
        *retaliation_detected = true;
    }

    if *retaliation_detected {
        execute_standard_tit_for_tat(round, Action::Cooperate, opponent1, opponent2)
    } else if round % TESTER_PERIOD == 0 {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// Pavlov: win-stay, lose-shift
fn execute_pavlov(own: &[Action], opponent1: &[Action], opponent2: &[Action]) -> Action {
    let (Some(&mine), Some(&first), Some(&second)) = (own.last(), opponent1.last(), opponent2.last())
    else {
        return Action::Cooperate;
    };

    if PAYOFF_TABLE.payoff(mine, first, second) >= PAVLOV_WIN_THRESHOLD {
        mine
    } else {
        mine.opposite()
    }
}

/// Trigger: any defection, ever, by either opponent
fn execute_trigger(opponent1: &[Action], opponent2: &[Action]) -> Action {
    if opponent1.iter().chain(opponent2).any(|a| a.is_defect()) {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// End-game defector: Standard Tit-for-Tat until the last stretch of the match
fn execute_end_game_defector(round: usize, opponent1: &[Action], opponent2: &[Action]) -> Action {
    if round >= END_GAME_ROUND {
        return Action::Defect;
    }
    execute_standard_tit_for_tat(round, Action::Cooperate, opponent1, opponent2)
}
