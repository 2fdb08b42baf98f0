//! Trilemma Tournament - Round-robin play over strategy triples
//!
//! This crate provides tournament infrastructure:
//! - Single three-player matches
//! - Round-robin passes over every triple (with repetition)
//! - Ranking with a stable, index-ordered tie-break
//! - Repeated experiments with per-strategy score history
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_experiments, run_tournament (orchestration)
//! - Level 2: execute_all_matches, accumulate_totals, rank (phases)
//! - Level 3: play_triple, run_match (steps)
//! - Level 4: configuration, errors

mod config;
mod error;
mod experiment;
mod match_play;
mod ranking;
mod tournament;

pub use config::{ExperimentConfig, RoundRange, TournamentConfig};
pub use error::{Result, TournamentError};
pub use experiment::{
    run_experiments, run_experiments_with_callback, ExperimentHistory, ExperimentResult,
    MeanScore, ScoreRow,
};
pub use match_play::{run_match, MatchResult};
pub use ranking::rank;
pub use tournament::{
    generate_triples, run_tournament, triple_count, MatchRecord, Standing, TournamentResult,
    Triple,
};
