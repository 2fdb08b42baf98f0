//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TournamentError};

/// Inclusive range of rounds per match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRange {
    pub min: u32,
    pub max: u32,
}

impl RoundRange {
    /// About 100 rounds, so strategies cannot count on a known last round
    pub const STANDARD: RoundRange = RoundRange { min: 90, max: 110 };

    /// Validated range
    pub fn new(min: u32, max: u32) -> Result<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Every match plays exactly `rounds` rounds
    pub fn fixed(rounds: u32) -> Result<Self> {
        Self::new(rounds, rounds)
    }

    /// Reject empty ranges and zero-round matches
    pub fn validate(&self) -> Result<()> {
        if self.min == 0 || self.min > self.max {
            return Err(TournamentError::InvalidRoundRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Uniform draw from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, rounds: u32) -> bool {
        (self.min..=self.max).contains(&rounds)
    }
}

impl Default for RoundRange {
    fn default() -> Self {
        RoundRange::STANDARD
    }
}

/// Tournament configuration
#[derive(Clone, Debug)]
pub struct TournamentConfig {
    /// Rounds per match
    pub rounds: RoundRange,
    /// Whether to run matches in parallel
    pub parallel: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: RoundRange::STANDARD,
            parallel: true,
        }
    }
}

impl TournamentConfig {
    /// Single-threaded tournament
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    /// Set round range
    pub fn with_rounds(mut self, rounds: RoundRange) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set parallel execution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.rounds.validate()
    }
}

/// Configuration for repeated experiments
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    /// Number of tournament passes
    pub experiments: usize,
    /// Configuration of each pass
    pub tournament: TournamentConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiments: 50,
            tournament: TournamentConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Create config with specified number of passes
    pub fn new(experiments: usize) -> Self {
        Self {
            experiments,
            ..Default::default()
        }
    }

    /// Set tournament configuration
    pub fn with_tournament(mut self, tournament: TournamentConfig) -> Self {
        self.tournament = tournament;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.experiments == 0 {
            return Err(TournamentError::NoExperiments);
        }
        self.tournament.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_round_range_defaults() {
        let range = RoundRange::default();
        assert_eq!(range.min, 90);
        assert_eq!(range.max, 110);
        assert!(range.validate().is_ok());
    }

    #[test]
    fn test_round_range_rejects_invalid() {
        assert!(matches!(
            RoundRange::new(0, 10),
            Err(TournamentError::InvalidRoundRange { min: 0, max: 10 })
        ));
        assert!(RoundRange::new(20, 10).is_err());
        assert!(RoundRange::fixed(0).is_err());
        assert!(RoundRange::fixed(1).is_ok());
    }

    #[test]
    fn test_round_range_sample_covers_bounds() {
        let range = RoundRange::STANDARD;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let samples: Vec<u32> = (0..5000).map(|_| range.sample(&mut rng)).collect();

        assert!(samples.iter().all(|&r| range.contains(r)));
        assert!(samples.contains(&90));
        assert!(samples.contains(&110));
    }

    #[test]
    fn test_tournament_config_defaults() {
        let config = TournamentConfig::default();
        assert_eq!(config.rounds, RoundRange::STANDARD);
        assert!(config.parallel);
        assert!(!TournamentConfig::sequential().parallel);
    }

    #[test]
    fn test_experiment_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.experiments, 50);
        assert!(config.validate().is_ok());

        assert!(matches!(
            ExperimentConfig::new(0).validate(),
            Err(TournamentError::NoExperiments)
        ));

        let bad_rounds = ExperimentConfig::new(3).with_tournament(TournamentConfig {
            rounds: RoundRange { min: 5, max: 1 },
            parallel: false,
        });
        assert!(bad_rounds.validate().is_err());
    }
}
