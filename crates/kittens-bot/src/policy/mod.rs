mod heuristic;
mod observer;
mod random;

pub use heuristic::HeuristicPolicy;
pub use observer::{DecisionObserver, DecisionRecord, RecordingObserver};
pub use random::RandomPolicy;

use crate::bot::{BotDifficulty, BotParams};
use kittens_core::game::snapshot::GameSnapshot;
use kittens_core::model::card::Card;
use kittens_core::model::hand::Hand;
use kittens_core::model::seat::SeatId;

/// Context provided to policies for decision-making
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub hand: &'a Hand,
    pub snapshot: GameSnapshot<'a>,
}

impl<'a> PolicyContext<'a> {
    pub fn new(hand: &'a Hand, snapshot: GameSnapshot<'a>) -> Self {
        Self { hand, snapshot }
    }

    pub fn seat(&self) -> SeatId {
        self.snapshot.seat()
    }
}

/// Decision interface the engine calls synchronously, once per decision point.
/// Implementations read the hand and snapshot but never mutate them.
pub trait Policy: Send {
    /// Card to play next this turn, or `None` to end the turn by drawing.
    fn play_turn(&mut self, ctx: &PolicyContext) -> Option<Card>;

    /// Where to reinsert a kitten this seat just defused (0 = next drawn).
    fn place_hazard(&mut self, ctx: &PolicyContext) -> usize;

    /// Reaction to seeing the next cards, most imminent first.
    fn react_to_peek(&mut self, ctx: &PolicyContext, top: &[Card]) -> Option<Card>;

    /// Optional: refresh bookkeeping from the public history.
    fn update_beliefs(&mut self, _ctx: &PolicyContext) {}
}

/// Builds the policy for `difficulty` with a deterministic random source.
/// `params` only tune the heuristic policy.
pub fn policy_for(difficulty: BotDifficulty, seed: u64, params: BotParams) -> Box<dyn Policy> {
    match difficulty {
        BotDifficulty::EasyRandom => Box::new(RandomPolicy::from_seed(seed)),
        BotDifficulty::NormalHeuristic => {
            Box::new(HeuristicPolicy::from_seed(seed).with_params(params))
        }
    }
}
