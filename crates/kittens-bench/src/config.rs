//! Tournament description read from YAML: the agents at the table, the deck
//! dealt to them, and where the results land.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kittens_bot::bot::{BotDifficulty, BotParams, HazardLevel};
use kittens_core::model::deck::DeckComposition;
use kittens_core::model::seat::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

const MAX_PLACE_JITTER: u8 = 10;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    pub run_id: String,
    #[serde(default)]
    pub seed: u64,
    pub games: usize,
    /// Seat orders each dealt game is replayed under; capped at n! at run time.
    #[serde(default = "default_permutations")]
    pub permutations: usize,
    #[serde(default)]
    pub deck: DeckComposition,
    pub agents: Vec<AgentConfig>,
    pub baseline: String,
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
    /// `{run_id}` is substituted.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Structured telemetry is written only when a level is set.
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_permutations() -> usize {
    6
}

fn default_latency_budget_ms() -> u64 {
    5
}

fn default_output_dir() -> String {
    "bench/out/{run_id}".to_string()
}

impl BenchmarkConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.run_id.is_empty()
            || !self
                .run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ValidationError::RunId(self.run_id.clone()));
        }
        if self.games == 0 || self.permutations == 0 {
            return Err(ValidationError::EmptySchedule);
        }
        if self.latency_budget_ms == 0 {
            return Err(ValidationError::LatencyBudget);
        }

        let seats = self.agents.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&seats) {
            return Err(ValidationError::TableSize(seats));
        }

        let mut names = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() || !names.insert(agent.name.as_str()) {
                return Err(ValidationError::AgentName(agent.name.clone()));
            }
            agent.bot_params(BotParams::default())?;
        }
        if !names.contains(self.baseline.as_str()) {
            return Err(ValidationError::Baseline(self.baseline.clone()));
        }

        let deck = &self.deck;
        if deck.hand_size == 0 || deck.pool_size() < deck.hand_size * seats {
            return Err(ValidationError::Deck {
                seats,
                hand_size: deck.hand_size,
                pool: deck.pool_size(),
            });
        }

        self.log_level()?;
        Ok(())
    }

    /// `None` keeps structured telemetry off.
    pub fn log_level(&self) -> Result<Option<Level>, ValidationError> {
        self.log_level
            .as_deref()
            .map(|raw| {
                Level::from_str(raw.trim()).map_err(|_| ValidationError::LogLevel(raw.to_string()))
            })
            .transpose()
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(self.output_dir.replace("{run_id}", &self.run_id))
    }
}

/// One seat's agent. Heuristic knobs are rejected for random agents.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default)]
    pub kind: AgentKind,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub skip_threshold: Option<String>,
    #[serde(default)]
    pub place_jitter: Option<u8>,
}

impl AgentConfig {
    /// Applies this agent's knobs on top of `base`.
    pub fn bot_params(&self, base: BotParams) -> Result<BotParams, ValidationError> {
        let invalid = |message: String| ValidationError::Agent {
            name: self.name.clone(),
            message,
        };

        if self.kind == AgentKind::Random
            && (self.skip_threshold.is_some() || self.place_jitter.is_some())
        {
            return Err(invalid(
                "skip_threshold and place_jitter only apply to heuristic agents".to_string(),
            ));
        }

        let mut params = base;
        if let Some(raw) = self.skip_threshold.as_deref() {
            params.skip_threshold = HazardLevel::from_label(raw)
                .ok_or_else(|| invalid(format!("unknown skip_threshold '{raw}'")))?;
        }
        if let Some(jitter) = self.place_jitter {
            if jitter > MAX_PLACE_JITTER {
                return Err(invalid(format!(
                    "place_jitter {jitter} is above {MAX_PLACE_JITTER}"
                )));
            }
            params.middle_jitter = jitter;
        }
        Ok(params)
    }
}

/// YAML face of [`BotDifficulty`]. Agents without a `kind` follow
/// `KITTENS_BOT_DIFFICULTY`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
    Random,
}

impl Default for AgentKind {
    fn default() -> Self {
        BotDifficulty::from_env().into()
    }
}

impl From<BotDifficulty> for AgentKind {
    fn from(difficulty: BotDifficulty) -> Self {
        match difficulty {
            BotDifficulty::EasyRandom => AgentKind::Random,
            BotDifficulty::NormalHeuristic => AgentKind::Heuristic,
        }
    }
}

impl From<AgentKind> for BotDifficulty {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Random => BotDifficulty::EasyRandom,
            AgentKind::Heuristic => BotDifficulty::NormalHeuristic,
        }
    }
}

pub const GAMES_FILE: &str = "games.jsonl";
pub const SUMMARY_FILE: &str = "summary.md";
pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Files of one run, all under a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn games(&self) -> PathBuf {
        self.dir.join(GAMES_FILE)
    }

    pub fn summary(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    pub fn telemetry(&self) -> PathBuf {
        self.dir.join(TELEMETRY_FILE)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("run_id '{0}' may only use ASCII letters, digits, '.', '_' and '-'")]
    RunId(String),
    #[error("games and permutations must both be at least 1")]
    EmptySchedule,
    #[error("latency_budget_ms must be greater than zero")]
    LatencyBudget,
    #[error("a table seats {MIN_PLAYERS} to {MAX_PLAYERS} agents, found {0}")]
    TableSize(usize),
    #[error("agent name '{0}' is empty or used twice")]
    AgentName(String),
    #[error("agent '{name}': {message}")]
    Agent { name: String, message: String },
    #[error("baseline '{0}' is not one of the agents")]
    Baseline(String),
    #[error("cannot deal {seats} hands of {hand_size} from a pool of {pool} cards")]
    Deck {
        seats: usize,
        hand_size: usize,
        pool: usize,
    },
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}
