mod belief;
mod params;
mod peek;
mod place;
mod tracker;
mod turn;

pub use belief::{AgentMemory, EstimateSource, HazardEstimate, HazardLevel, PeekBelief};
pub use params::BotParams;
pub use peek::{PeekPlanner, PeekReaction};
pub use place::{Placement, PlacementPlanner, PlacementRule};
pub use tracker::{HistoryCounts, HistoryTracker};
pub use turn::{TurnDecision, TurnPlanner, TurnReason};

use kittens_core::game::snapshot::GameSnapshot;
use kittens_core::model::hand::Hand;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Priority list with random picks and random kitten placement.
    EasyRandom,
    #[default]
    NormalHeuristic,
}

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| {
            std::env::var("KITTENS_BOT_DIFFICULTY")
                .ok()
                .and_then(|raw| Self::from_label(&raw))
                .unwrap_or_default()
        })
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" | "random" => Some(BotDifficulty::EasyRandom),
            "normal" | "heuristic" | "default" => Some(BotDifficulty::NormalHeuristic),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::EasyRandom => "easy",
            BotDifficulty::NormalHeuristic => "normal",
        }
    }
}

/// Everything the heuristic planners look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub hand: &'a Hand,
    pub snapshot: GameSnapshot<'a>,
    pub params: &'a BotParams,
    belief: Option<HazardLevel>,
}

impl<'a> BotContext<'a> {
    pub fn new(
        hand: &'a Hand,
        snapshot: GameSnapshot<'a>,
        params: &'a BotParams,
        memory: &AgentMemory,
    ) -> Self {
        Self {
            hand,
            snapshot,
            params,
            belief: memory.current(&snapshot),
        }
    }

    pub fn belief(&self) -> Option<HazardLevel> {
        self.belief
    }

    pub fn hazard_estimate(&self) -> HazardEstimate {
        HazardEstimate::compute(&self.snapshot, self.belief)
    }
}
