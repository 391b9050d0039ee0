use std::path::PathBuf;

use clap::Parser;

use kittens_bench::config::BenchmarkConfig;
use kittens_bench::logging::init_logging;
use kittens_bench::tournament::TournamentRunner;

/// Tournament harness for Exploding Kittens bots.
#[derive(Debug, Parser)]
#[command(
    name = "kittens-bench",
    author,
    version,
    about = "Deterministic Exploding Kittens tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to deal.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of seat permutations per game.
    #[arg(long, value_name = "COUNT")]
    permutations: Option<usize>,

    /// Enable structured telemetry at this tracing level.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(permutations) = cli.permutations {
        config.permutations = permutations;
    }
    if let Some(level) = cli.log_level {
        config.log_level = Some(level);
    }

    config.validate()?;
    let paths = config.output_paths();
    println!(
        "Loaded configuration '{}' with {} agents ({} games, {} permutations)",
        config.run_id,
        config.agents.len(),
        config.games,
        config.permutations
    );

    let _logging_guard = init_logging(config.log_level()?, &paths, &config.run_id)?;
    let run_id = config.run_id.clone();
    let runner = TournamentRunner::new(config)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games × {} permutations → {} rows at {}",
        summary.games_played,
        summary.permutations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    if summary.capped_games > 0 {
        println!(
            "WARN: {} games hit the turn cap and ended without a winner",
            summary.capped_games
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
