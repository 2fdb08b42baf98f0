//! Tournament configuration errors
//!
//! Level 4 - Utilities and configuration

use trilemma_core::RosterError;

/// Errors surfaced before any simulation work starts
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("round count must be positive")]
    ZeroRounds,

    #[error("invalid round range {min}..={max}: bounds must be positive and ordered")]
    InvalidRoundRange { min: u32, max: u32 },

    #[error("experiment count must be positive")]
    NoExperiments,
}

pub type Result<T> = std::result::Result<T, TournamentError>;
