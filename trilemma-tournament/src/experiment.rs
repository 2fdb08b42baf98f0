//! Repeated experiments - independent tournament passes over one roster
//!
//! Level 1 - Orchestration

use std::cmp::Ordering;

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;
use trilemma_core::Roster;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::tournament::{run_tournament, TournamentResult};

/// Per-name record of total score in each experiment
#[derive(Clone, Debug, Default)]
pub struct ExperimentHistory {
    /// Names in first-registration order
    order: Vec<String>,
    scores: FxHashMap<String, Vec<f64>>,
}

/// A name with its mean total over all experiments
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeanScore {
    pub name: String,
    pub mean: f64,
}

/// One row of the consolidated score table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRow {
    pub name: String,
    /// Total score in experiments 1..=K
    pub scores: Vec<f64>,
    pub mean: f64,
}

impl ExperimentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History with every roster name registered, in roster order
    pub fn for_roster(roster: &Roster) -> Self {
        let mut history = Self::new();
        for entry in roster.iter() {
            history.register(&entry.name);
        }
        history
    }

    fn register(&mut self, name: &str) -> &mut Vec<f64> {
        if !self.scores.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.scores.entry(name.to_string()).or_default()
    }

    /// Append one experiment's total for `name`
    pub fn record(&mut self, name: &str, score: f64) {
        self.register(name).push(score);
    }

    /// Append the totals of a finished pass, one per roster slot
    pub fn record_pass(&mut self, roster: &Roster, result: &TournamentResult) {
        for (entry, &total) in roster.iter().zip(&result.totals) {
            self.record(&entry.name, total);
        }
    }

    /// Recorded totals for `name`, oldest first
    pub fn scores(&self, name: &str) -> Option<&[f64]> {
        self.scores.get(name).map(Vec::as_slice)
    }

    /// Number of experiments recorded (the longest score list)
    pub fn experiments(&self) -> usize {
        self.scores.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Arithmetic mean of the recorded totals for `name`
    pub fn mean(&self, name: &str) -> Option<f64> {
        let scores = self.scores(name)?;
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Means in registration order; names with no scores get 0.0
    pub fn means(&self) -> Vec<MeanScore> {
        self.order
            .iter()
            .map(|name| MeanScore {
                name: name.clone(),
                mean: self.mean(name).unwrap_or(0.0),
            })
            .collect()
    }

    /// Means sorted descending; equal means keep registration order
    pub fn ranked_by_mean(&self) -> Vec<MeanScore> {
        let mut means = self.means();
        means.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
        means
    }

    /// Consolidated table, rows sorted by descending mean
    pub fn table(&self) -> Vec<ScoreRow> {
        self.ranked_by_mean()
            .into_iter()
            .map(|MeanScore { name, mean }| ScoreRow {
                scores: self.scores(&name).map(<[f64]>::to_vec).unwrap_or_default(),
                name,
                mean,
            })
            .collect()
    }
}

/// Result of a batch of experiments
#[derive(Clone, Debug)]
pub struct ExperimentResult {
    pub history: ExperimentHistory,
    /// Number of passes run
    pub experiments: usize,
}

/// Run `config.experiments` independent passes (Level 1 orchestration)
pub fn run_experiments<R: Rng + ?Sized>(
    roster: &Roster,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<ExperimentResult> {
    run_experiments_with_callback(roster, config, rng, |_, _| {})
}

/// Run experiments, calling `on_pass(experiment_number, result)` after each pass.
///
/// Experiment numbers start at 1. The whole configuration is checked before
/// the first pass.
pub fn run_experiments_with_callback<R, F>(
    roster: &Roster,
    config: &ExperimentConfig,
    rng: &mut R,
    mut on_pass: F,
) -> Result<ExperimentResult>
where
    R: Rng + ?Sized,
    F: FnMut(usize, &TournamentResult),
{
    config.validate()?;

    let mut history = ExperimentHistory::for_roster(roster);

    for experiment in 1..=config.experiments {
        let result = run_tournament(roster, &config.tournament, rng)?;

        if let Some(winner) = result.winner() {
            tracing::info!(
                "Experiment {}/{}: winner {} ({:.2})",
                experiment,
                config.experiments,
                winner.name,
                winner.score
            );
        }

        history.record_pass(roster, &result);
        on_pass(experiment, &result);
    }

    Ok(ExperimentResult {
        history,
        experiments: config.experiments,
    })
}
