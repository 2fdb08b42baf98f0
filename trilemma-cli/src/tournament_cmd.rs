//! Tournament command - one round-robin pass over a roster
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_roster(), build_config(), report_results()
//! - Level 3: match_log_lines(), standings_lines()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trilemma_core::Roster;
use trilemma_tournament::{
    run_tournament, MatchRecord, RoundRange, Standing, TournamentConfig, TournamentResult,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Roster selection shared by every command that plays tournaments
#[derive(Args, Clone, Debug)]
pub struct RosterArgs {
    /// Built-in roster (standard, defect-flood)
    #[arg(long, default_value = "standard")]
    pub preset: String,

    /// Roster JSON file (overrides --preset)
    #[arg(long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Minimum rounds per match
    #[arg(long, default_value = "90")]
    pub min_rounds: u32,

    /// Maximum rounds per match
    #[arg(long, default_value = "110")]
    pub max_rounds: u32,

    /// Play matches of a pass in parallel
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args)]
pub struct TournamentArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Write per-match results to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Load the roster and build the configuration
/// 2. Play one pass
/// 3. Write the match log and report standings
pub fn run(args: TournamentArgs, seed: Option<u64>) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    let config = build_config(&args.roster)?;
    let mut rng = create_rng(seed);

    tracing::info!(
        "Starting tournament: {} players, rounds {}..={}",
        roster.len(),
        config.rounds.min,
        config.rounds.max
    );

    let result = run_tournament(&roster, &config, &mut rng).context("Tournament failed")?;

    if let Some(path) = &args.log {
        save_match_log(&result, path)?;
    }

    report_results(&result, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Resolve the roster from a file or a preset name
pub fn load_roster(args: &RosterArgs) -> Result<Roster> {
    match &args.roster {
        Some(path) => Roster::load(path)
            .with_context(|| format!("Failed to load roster: {}", path.display())),
        None => Roster::preset(&args.preset)
            .with_context(|| format!("Unknown preset '{}'", args.preset)),
    }
}

/// Build tournament configuration from command arguments
pub fn build_config(args: &RosterArgs) -> Result<TournamentConfig> {
    let rounds = RoundRange::new(args.min_rounds, args.max_rounds)
        .context("Invalid round range")?;

    Ok(TournamentConfig::default()
        .with_rounds(rounds)
        .with_parallel(args.parallel))
}

fn save_match_log(result: &TournamentResult, path: &Path) -> Result<()> {
    let mut content = match_log_lines(&result.records).join("\n");
    content.push('\n');

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write match log: {}", path.display()))?;
    tracing::info!("Saved match log to {}", path.display());

    Ok(())
}

fn report_results(result: &TournamentResult, args: &TournamentArgs) -> Result<()> {
    if args.json {
        print_json_results(result)
    } else {
        print_text_results(result);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One line per match, in the order the matches were scheduled
pub fn match_log_lines(records: &[MatchRecord]) -> Vec<String> {
    records.iter().map(format_match).collect()
}

/// `name: score points.` per standing
pub fn standings_lines(standings: &[Standing]) -> Vec<String> {
    standings
        .iter()
        .map(|s| format!("{}: {:.2} points.", s.name, s.score))
        .collect()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_match(record: &MatchRecord) -> String {
    let seats: Vec<String> = record
        .seats()
        .map(|(name, score, _)| format!("{} scored {:.2} points", name, score))
        .collect();
    format!(
        "{}, {}, and {}. (Rounds: {})",
        seats[0], seats[1], seats[2], record.rounds
    )
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print standings as JSON
fn print_json_results(result: &TournamentResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        matches: usize,
        winner: Option<&'a str>,
        standings: &'a [Standing],
    }

    let output = JsonOutput {
        matches: result.match_count(),
        winner: result.winner().map(|s| s.name.as_str()),
        standings: &result.standings,
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    Ok(())
}

/// Print standings as text
fn print_text_results(result: &TournamentResult) {
    println!("\n=== Tournament Results ===");
    println!("Matches played: {}", result.match_count());
    println!();
    for (rank, line) in standings_lines(&result.standings).iter().enumerate() {
        println!("{:>3}. {}", rank + 1, line);
    }
}

// ============================================================================
// TESTS
// ============================================================================
