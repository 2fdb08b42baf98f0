//! Trilemma Core - Three-player Prisoner's Dilemma primitives
//!
//! This crate provides the building blocks of a tournament:
//! - Actions and the 2x2x2 payoff table
//! - Per-seat match history with opponent rotation
//! - The closed set of strategies and their per-match state
//! - Rosters (ordered strategy slots) and roster loading

pub mod action;
pub mod payoff;
pub mod history;
pub mod strategy;
pub mod roster;

// Re-exports for convenient access
pub use action::Action;
pub use payoff::{payoff, PayoffTable, PAYOFF_TABLE};
pub use history::{MatchHistory, Seat, SeatView};
pub use strategy::{Player, StrategyKind};
pub use roster::{Roster, RosterEntry, RosterError};
