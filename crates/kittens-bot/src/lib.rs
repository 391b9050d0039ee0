pub mod bot;
pub mod policy;

pub use bot::{
    AgentMemory, BotContext, BotDifficulty, BotParams, HazardEstimate, HazardLevel,
    HistoryCounts, HistoryTracker, PeekBelief, PeekPlanner, PlacementPlanner, TurnPlanner,
};
pub use policy::{
    DecisionObserver, DecisionRecord, HeuristicPolicy, Policy, PolicyContext, RandomPolicy,
    RecordingObserver, policy_for,
};
