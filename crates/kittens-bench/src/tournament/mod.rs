mod game;
mod permutations;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, OutputPaths, ValidationError};
use kittens_bot::bot::{BotDifficulty, BotParams};
use kittens_bot::policy::{Policy, policy_for};
use kittens_core::game::state::{GameError, GameState};
use kittens_core::model::seat::SeatId;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

pub use game::{DecisionSummary, GameDriver, GameEnd, MAX_TURNS, SeatState, TurnEnd, play_turn};
pub use permutations::SeatPermutations;

/// Primary entry point for orchestrating tournaments.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    paths: OutputPaths,
    agents: Vec<AgentBlueprint>,
    seat_permutations: SeatPermutations,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub permutations: usize,
    pub rows_written: usize,
    pub capped_games: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner, validating `config` first. Heuristic agents start from
    /// `BotParams::from_env` and apply their own knobs on top.
    pub fn new(config: BenchmarkConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let logging_enabled = config.log_level()?.is_some();
        let agents = AgentBlueprint::from_configs(&config.agents, BotParams::from_env())?;

        let available = SeatPermutations::max_for(agents.len());
        if config.permutations > available {
            event!(
                target: "kittens_bench::run",
                Level::WARN,
                requested = config.permutations,
                available,
                "seat permutations capped"
            );
        }
        let seat_permutations = SeatPermutations::new(agents.len(), config.permutations);

        Ok(Self {
            paths: config.output_paths(),
            config,
            agents,
            seat_permutations,
            logging_enabled,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_dir(&self.paths.dir)?;

        let jsonl_path = self.paths.games();
        let mut writer = BufWriter::new(File::create(&jsonl_path)?);
        let permutations = self.seat_permutations.as_slice();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut rows_written = 0usize;
        let mut capped_games = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for game_index in 0..self.config.games {
            let game_seed = rng.next_u64();

            for (perm_index, perm) in permutations.iter().enumerate() {
                let outcome = self.play_game(game_index, perm_index, game_seed, perm)?;
                if outcome.capped {
                    capped_games += 1;
                }
                analytics.record_game(&outcome)?;
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config,
                    game_index,
                    perm_index,
                    game_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let summary_path = self.paths.summary();
        let summary = analytics.finalize()?;
        summary.write_markdown(&summary_path)?;

        Ok(RunSummary {
            games_played: self.config.games,
            permutations: permutations.len(),
            rows_written,
            capped_games,
            jsonl_path,
            summary_path,
            telemetry_path: self.logging_enabled.then(|| self.paths.telemetry()),
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        permutation_index: usize,
        game_seed: u64,
        permutation: &[usize],
    ) -> Result<GameOutcome, RunnerError> {
        let mut state = GameState::new(permutation.len(), &self.config.deck, game_seed)?;
        let mut seats = build_seat_states(permutation, &self.agents, game_seed)?;

        let driver = GameDriver {
            run_id: &self.config.run_id,
            game_index,
            permutation_index,
            logging_enabled: self.logging_enabled,
        };
        let end = driver.play(&mut state, &mut seats)?;

        let seating = seats
            .iter()
            .map(|seat| SeatSnapshot {
                seat: seat.seat.to_string(),
                bot: seat.agent_name.clone(),
            })
            .collect();

        let seat_results = seats
            .iter()
            .map(|seat| SeatResult {
                agent_name: seat.agent_name.clone(),
                seat: seat.seat,
                won: end.winner == Some(seat.seat),
                eliminated: seat.eliminated_at.is_some(),
                survived_turns: seat.eliminated_at.unwrap_or(end.turns),
                cards_played: seat.cards_played,
                defuses_used: seat.defuses_used,
                metrics: seat.metrics(),
            })
            .collect();

        Ok(GameOutcome {
            seating,
            seat_results,
            winner: end.winner,
            turns: end.turns,
            capped: end.capped,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<(), RunnerError> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}_P{permutation_index:03}");

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index,
            permutation_index,
            game_seed,
            seat: seat_result.seat.to_string(),
            bot: seat_result.agent_name.clone(),
            seating: outcome.seating.clone(),
            won: seat_result.won,
            eliminated: seat_result.eliminated,
            survived_turns: seat_result.survived_turns,
            turns: outcome.turns,
            capped: outcome.capped,
            cards_played: seat_result.cards_played,
            defuses_used: seat_result.defuses_used,
            speed_ms_decision: seat_result.metrics.avg_ms_per_decision,
            decisions: seat_result.metrics.decisions,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn build_seat_states(
    permutation: &[usize],
    agents: &[AgentBlueprint],
    game_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seats = Vec::with_capacity(permutation.len());
    for (seat_idx, agent_idx) in permutation.iter().enumerate() {
        let seat = SeatId::from_index(seat_idx).ok_or_else(|| {
            RunnerError::game(format!("invalid seat index generated: {seat_idx}"))
        })?;
        let agent = agents
            .get(*agent_idx)
            .ok_or(RunnerError::InvalidPermutation {
                index: seat_idx,
                agent_index: *agent_idx,
            })?;
        let policy = agent.spawn_policy(game_seed, seat_idx);
        seats.push(SeatState::new(seat, agent.name.clone(), policy));
    }
    Ok(seats)
}

pub struct GameOutcome {
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
    pub winner: Option<SeatId>,
    pub turns: u32,
    pub capped: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: String,
    pub bot: String,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: SeatId,
    pub won: bool,
    pub eliminated: bool,
    pub survived_turns: u32,
    pub cards_played: u32,
    pub defuses_used: u32,
    pub metrics: DecisionSummary,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    seat: String,
    bot: String,
    seating: Vec<SeatSnapshot>,
    won: bool,
    eliminated: bool,
    survived_turns: u32,
    turns: u32,
    capped: bool,
    cards_played: u32,
    defuses_used: u32,
    speed_ms_decision: f64,
    decisions: u32,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("engine rejected a move: {0}")]
    Rules(#[from] GameError),
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("permutation index {index} references invalid agent index {agent_index}")]
    InvalidPermutation { index: usize, agent_index: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

struct AgentBlueprint {
    name: String,
    difficulty: BotDifficulty,
    seed: u64,
    params: BotParams,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig], base: BotParams) -> Result<Vec<Self>, ValidationError> {
        configs
            .iter()
            .map(|config| -> Result<Self, ValidationError> {
                Ok(Self {
                    name: config.name.clone(),
                    difficulty: config.kind.into(),
                    seed: config.seed,
                    params: config.bot_params(base)?,
                })
            })
            .collect()
    }

    fn spawn_policy(&self, game_seed: u64, seat_index: usize) -> Box<dyn Policy> {
        let seed = policy_seed(self.seed, game_seed, seat_index);
        policy_for(self.difficulty, seed, self.params)
    }
}

/// Per-seat RNG seed: stable for a given game, seat and agent.
fn policy_seed(agent_seed: u64, game_seed: u64, seat_index: usize) -> u64 {
    let seat_mix = (seat_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    game_seed ^ agent_seed.rotate_left(32) ^ seat_mix
}
