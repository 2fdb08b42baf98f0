//! Tournament execution - round-robin over every triple
//!
//! Level 1 - Orchestration and Level 2 - Phases

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use trilemma_core::{Player, Roster};

use crate::config::TournamentConfig;
use crate::error::Result;
use crate::match_play::run_match;
use crate::ranking::rank;

/// Roster slots seated as A, B, C (`a <= b <= c`)
pub type Triple = [usize; 3];

/// One match of a tournament pass
#[derive(Clone, Debug, Serialize)]
pub struct MatchRecord {
    /// Roster slots of seats A, B, C
    pub triple: Triple,
    /// Display names of seats A, B, C
    pub names: [String; 3],
    /// Average score per round of seats A, B, C
    pub scores: [f64; 3],
    /// Rounds played
    pub rounds: u32,
}

impl MatchRecord {
    /// (name, average score, rounds) for each seat
    pub fn seats(&self) -> impl Iterator<Item = (&str, f64, u32)> + '_ {
        self.names
            .iter()
            .zip(self.scores)
            .map(move |(name, score)| (name.as_str(), score, self.rounds))
    }
}

/// Final position of a roster slot
#[derive(Clone, Debug, Serialize)]
pub struct Standing {
    /// Index of the player in the roster
    pub index: usize,
    /// Display name
    pub name: String,
    /// Sum of average match scores over every seat the slot occupied
    pub score: f64,
}

/// Result of a tournament pass
#[derive(Clone, Debug, Serialize)]
pub struct TournamentResult {
    /// Matches in triple order
    pub records: Vec<MatchRecord>,
    /// Total score per roster slot
    pub totals: Vec<f64>,
    /// Standings sorted by score (descending), ties by roster order
    pub standings: Vec<Standing>,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Number of matches played
    pub fn match_count(&self) -> usize {
        self.records.len()
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run one round-robin pass (Level 1 orchestration)
///
/// Every triple `i <= j <= k` plays one match with freshly built players.
/// One seed is drawn from `rng`; each triple then gets its own random stream,
/// so parallel and sequential passes agree.
///
/// # Arguments
/// * `roster` - Participants in the tournament
/// * `config` - Tournament configuration
/// * `rng` - Random source for the pass
///
/// # Returns
/// Match log, per-slot totals and ranked standings
pub fn run_tournament<R: Rng + ?Sized>(
    roster: &Roster,
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<TournamentResult> {
    config.validate()?;

    let seed: u64 = rng.gen();
    let triples = generate_triples(roster.len());

    tracing::debug!(
        "Tournament pass: {} players, {} matches, rounds {}..={}",
        roster.len(),
        triples.len(),
        config.rounds.min,
        config.rounds.max
    );

    let records = execute_all_matches(roster, &triples, config, seed)?;
    let totals = accumulate_totals(roster.len(), &records);
    let standings = compute_standings(roster, &totals);

    if let Some(winner) = standings.first() {
        tracing::debug!("Pass winner: {} ({:.2})", winner.name, winner.score);
    }

    Ok(TournamentResult {
        records,
        totals,
        standings,
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Generate every triple with repetition, in lexicographic order
pub fn generate_triples(n: usize) -> Vec<Triple> {
    let mut triples = Vec::with_capacity(triple_count(n));
    for i in 0..n {
        for j in i..n {
            for k in j..n {
                triples.push([i, j, k]);
            }
        }
    }
    triples
}

/// Number of triples with repetition over `n` players: n(n+1)(n+2)/6
pub fn triple_count(n: usize) -> usize {
    n * (n + 1) * (n + 2) / 6
}

/// Execute all matches, keeping triple order in the output
fn execute_all_matches(
    roster: &Roster,
    triples: &[Triple],
    config: &TournamentConfig,
    seed: u64,
) -> Result<Vec<MatchRecord>> {
    if config.parallel {
        triples
            .par_iter()
            .enumerate()
            .map(|(i, &triple)| play_triple(roster, triple, config, seed, i))
            .collect()
    } else {
        triples
            .iter()
            .enumerate()
            .map(|(i, &triple)| play_triple(roster, triple, config, seed, i))
            .collect()
    }
}

/// Add each seat's score to the slot that occupied it
fn accumulate_totals(n: usize, records: &[MatchRecord]) -> Vec<f64> {
    let mut totals = vec![0.0f64; n];
    for record in records {
        for (&slot, &score) in record.triple.iter().zip(&record.scores) {
            totals[slot] += score;
        }
    }
    totals
}

/// Rank slots and attach names
fn compute_standings(roster: &Roster, totals: &[f64]) -> Vec<Standing> {
    rank(totals)
        .into_iter()
        .map(|index| Standing {
            index,
            name: roster.entries()[index].name.clone(),
            score: totals[index],
        })
        .collect()
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Play the match of one triple with its own random stream
fn play_triple(
    roster: &Roster,
    triple: Triple,
    config: &TournamentConfig,
    seed: u64,
    match_index: usize,
) -> Result<MatchRecord> {
    let mut rng = match_rng(seed, match_index);

    let entries = [
        roster.get(triple[0])?,
        roster.get(triple[1])?,
        roster.get(triple[2])?,
    ];

    // Fresh players every match: no state survives from an earlier triple
    let [a, b, c] = entries.map(|entry| Player::new(entry.kind, &mut rng));
    let rounds = config.rounds.sample(&mut rng);
    let result = run_match(a, b, c, rounds, &mut rng)?;

    tracing::trace!(
        "{} {:.2}, {} {:.2}, {} {:.2} ({} rounds)",
        entries[0].name,
        result.scores[0],
        entries[1].name,
        result.scores[1],
        entries[2].name,
        result.scores[2],
        rounds
    );

    Ok(MatchRecord {
        triple,
        names: entries.map(|entry| entry.name.clone()),
        scores: result.scores,
        rounds,
    })
}

/// Independent stream for match `match_index` of a pass
fn match_rng(seed: u64, match_index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(match_index as u64);
    rng
}
