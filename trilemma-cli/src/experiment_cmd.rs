//! Experiment command - repeated tournament passes with consolidated scores
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_batch(), save_results()
//! - Level 3: experiment_log_section(), consolidated_csv()
//! - Level 4: file I/O, formatting utilities

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use trilemma_core::Roster;
use trilemma_tournament::{
    run_experiments_with_callback, ExperimentConfig, ExperimentHistory, ExperimentResult,
    MeanScore, TournamentResult,
};

use crate::tournament_cmd::{
    build_config, create_rng, load_roster, match_log_lines, standings_lines, RosterArgs,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ExperimentArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Number of tournament passes
    #[arg(long, default_value = "50")]
    pub experiments: usize,

    /// Output directory for the log and score table
    #[arg(long, default_value = "experiment_results")]
    pub output: PathBuf,

    /// Print the mean-score summary as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run experiment command
///
/// 1. Load the roster and build the configuration
/// 2. Run every pass, collecting the match log
/// 3. Save the log and the consolidated score table
/// 4. Print the summary
pub fn run(args: ExperimentArgs, seed: Option<u64>) -> Result<()> {
    let roster = load_roster(&args.roster)?;
    let config = ExperimentConfig::new(args.experiments).with_tournament(build_config(&args.roster)?);

    tracing::info!(
        "Starting experiments: {} passes, {} players",
        config.experiments,
        roster.len()
    );

    let (result, log) = run_batch(&roster, &config, seed)?;

    save_results(&result, &log, &args.output)?;

    if args.json {
        print_json_results(&result)?;
    } else {
        print_text_results(&result);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Run all passes, returning the history and the full match log
fn run_batch(
    roster: &Roster,
    config: &ExperimentConfig,
    seed: Option<u64>,
) -> Result<(ExperimentResult, String)> {
    let mut rng = create_rng(seed);
    let mut log = String::new();

    let result = run_experiments_with_callback(roster, config, &mut rng, |experiment, pass| {
        log.push_str(&experiment_log_section(experiment, pass));
    })
    .context("Experiment failed")?;

    Ok((result, log))
}

/// Write `tournament_log.txt` and `consolidated_scores.csv`
fn save_results(result: &ExperimentResult, log: &str, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let log_path = output.join("tournament_log.txt");
    std::fs::write(&log_path, log).context("Failed to write tournament log")?;
    tracing::info!("Saved tournament log to {}", log_path.display());

    let csv_path = output.join("consolidated_scores.csv");
    std::fs::write(&csv_path, consolidated_csv(&result.history))
        .context("Failed to write consolidated scores")?;
    tracing::info!("Saved consolidated scores to {}", csv_path.display());

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Log block for one pass: every match, then the ranked totals
pub fn experiment_log_section(experiment: usize, pass: &TournamentResult) -> String {
    let rule = "-".repeat(30);
    let mut section = format!("Experiment #{}\n{}\n", experiment, rule);

    for line in match_log_lines(&pass.records) {
        section.push_str(&line);
        section.push('\n');
    }

    section.push_str(&format!(
        "\nTournament Results for Experiment #{}\n{}\n",
        experiment, rule
    ));
    for line in standings_lines(&pass.standings) {
        section.push_str(&line);
        section.push('\n');
    }
    section.push_str("\n\n");

    section
}

/// Score table: one column per experiment and a trailing average,
/// rows in descending average order
pub fn consolidated_csv(history: &ExperimentHistory) -> String {
    let mut content = String::from("Strategy");
    for i in 1..=history.experiments() {
        content.push_str(&format!(",Exp{}", i));
    }
    content.push_str(",Average\n");

    for row in history.table() {
        content.push_str(&csv_field(&row.name));
        for score in &row.scores {
            content.push_str(&format!(",{:.2}", score));
        }
        content.push_str(&format!(",{:.2}\n", row.mean));
    }

    content
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Quote a field when it holds a separator, quote or line break (RFC 4180)
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Print the ranked means as JSON
fn print_json_results(result: &ExperimentResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        experiments: usize,
        ranking: Vec<MeanScore>,
    }

    let output = JsonOutput {
        experiments: result.experiments,
        ranking: result.history.ranked_by_mean(),
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    Ok(())
}

/// Print the ranked means as text
fn print_text_results(result: &ExperimentResult) {
    println!("\n=== Average Scores over {} Experiments ===", result.experiments);
    for (rank, mean) in result.history.ranked_by_mean().iter().enumerate() {
        println!("{:>3}. {:<32} {:.2}", rank + 1, mean.name, mean.mean);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trilemma_tournament::{run_tournament, RoundRange, TournamentConfig};

    #[test]
    fn test_consolidated_csv_format() {
        let mut history = ExperimentHistory::new();
        history.record("pavlov", 10.0);
        history.record("joss", 20.0);
        history.record("pavlov", 11.0);
        history.record("joss", 21.5);

        let csv = consolidated_csv(&history);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Strategy,Exp1,Exp2,Average");
        assert_eq!(lines[1], "joss,20.00,21.50,20.75");
        assert_eq!(lines[2], "pavlov,10.00,11.00,10.50");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("pavlov"), "pavlov");
        assert_eq!(csv_field("grim, the reaper"), "\"grim, the reaper\"");
        assert_eq!(csv_field("the \"judge\""), "\"the \"\"judge\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_consolidated_csv_keeps_columns_with_commas_in_names() {
        let roster = Roster::from_json(
            r#"[{"name": "grim, the reaper", "strategy": "trigger"}, "pavlov"]"#,
        )
        .unwrap();
        let config = ExperimentConfig::new(1).with_tournament(TournamentConfig::sequential());
        let (result, _) = run_batch(&roster, &config, Some(2)).unwrap();

        let csv = consolidated_csv(&result.history);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Strategy,Exp1,Average");

        let grim = lines
            .iter()
            .find(|line| line.starts_with("\"grim, the reaper\","))
            .unwrap();
        // Quoted name plus two score columns
        let unquoted = grim.trim_start_matches("\"grim, the reaper\"");
        assert_eq!(unquoted.split(',').count(), 3);
        assert!(lines.iter().any(|line| line.starts_with("pavlov,")));
    }

    #[test]
    fn test_experiment_log_section() {
        let roster = Roster::from_tags(["always-cooperate"]).unwrap();
        let config = TournamentConfig::sequential().with_rounds(RoundRange::fixed(10).unwrap());
        let pass = run_tournament(&roster, &config, &mut create_rng(Some(1))).unwrap();

        let section = experiment_log_section(3, &pass);
        let lines: Vec<&str> = section.lines().collect();
        assert_eq!(lines[0], "Experiment #3");
        assert_eq!(lines[1], "-".repeat(30));
        assert_eq!(
            lines[2],
            "always-cooperate scored 6.00 points, always-cooperate scored 6.00 points, \
             and always-cooperate scored 6.00 points. (Rounds: 10)"
        );
        assert_eq!(lines[4], "Tournament Results for Experiment #3");
        assert_eq!(lines[6], "always-cooperate: 18.00 points.");
    }

    #[test]
    fn test_run_batch_logs_every_pass() {
        let roster = Roster::from_tags(["always-defect", "trigger"]).unwrap();
        let config = ExperimentConfig::new(3).with_tournament(TournamentConfig::sequential());
        let (result, log) = run_batch(&roster, &config, Some(5)).unwrap();

        assert_eq!(result.experiments, 3);
        assert_eq!(log.matches("Experiment #").count(), 6);
        assert_eq!(log.matches("(Rounds: ").count(), 12);
    }
}
