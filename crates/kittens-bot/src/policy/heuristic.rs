use super::observer::{DecisionObserver, DecisionRecord};
use super::{Policy, PolicyContext};
use crate::bot::{
    AgentMemory, BotContext, BotParams, HistoryCounts, HistoryTracker, PeekBelief, PeekPlanner,
    PeekReaction, Placement, PlacementPlanner, TurnDecision, TurnPlanner,
};
use kittens_core::model::card::Card;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// Risk-aware policy: peeks first, skips when the next draw looks dangerous,
/// sheds normal cards otherwise, and places defused kittens by table shape.
pub struct HeuristicPolicy<R: Rng = SmallRng> {
    params: BotParams,
    memory: AgentMemory,
    tracker: HistoryTracker,
    rng: R,
    observer: Option<Box<dyn DecisionObserver>>,
}

impl HeuristicPolicy<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for HeuristicPolicy<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> HeuristicPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            params: BotParams::default(),
            memory: AgentMemory::new(),
            tracker: HistoryTracker::new(),
            rng,
            observer: None,
        }
    }

    pub fn with_params(mut self, params: BotParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    pub fn history(&self) -> HistoryCounts {
        self.tracker.counts()
    }

    fn notify(&mut self, record: DecisionRecord) {
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&record);
        }
    }
}

impl<R: Rng + Send> Policy for HeuristicPolicy<R> {
    fn play_turn(&mut self, ctx: &PolicyContext) -> Option<Card> {
        self.memory.refresh(&ctx.snapshot);
        let bot_ctx = BotContext::new(ctx.hand, ctx.snapshot, &self.params, &self.memory);
        let decision = TurnPlanner::choose(&bot_ctx, &mut self.rng);

        log_play_decision(ctx, &decision);
        self.notify(DecisionRecord::Play {
            seat: ctx.seat(),
            hazard_probability: decision.estimate.probability,
            chosen: decision.card,
            reason: decision.reason.as_str(),
        });
        decision.card
    }

    fn place_hazard(&mut self, ctx: &PolicyContext) -> usize {
        let placement = PlacementPlanner::choose(&ctx.snapshot, &self.params, &mut self.rng);
        // Our own kitten just reordered the pile.
        self.memory.forget();

        log_placement(ctx, &placement);
        self.notify(DecisionRecord::Placement {
            seat: ctx.seat(),
            cards_remaining: ctx.snapshot.cards_remaining(),
            position: placement.position,
            rule: Some(placement.rule),
        });
        placement.position
    }

    fn react_to_peek(&mut self, ctx: &PolicyContext, top: &[Card]) -> Option<Card> {
        let reaction = PeekPlanner::react(ctx.hand, top);
        if let Some(level) = reaction.belief {
            self.memory
                .remember(PeekBelief::observe(level, &ctx.snapshot));
        }

        log_peek_reaction(ctx, top, &reaction);
        self.notify(DecisionRecord::Peek {
            seat: ctx.seat(),
            top: top.to_vec(),
            reaction: reaction.play,
            belief: reaction.belief,
        });
        reaction.play
    }

    fn update_beliefs(&mut self, ctx: &PolicyContext) {
        if !self.tracker.observe(&ctx.snapshot) {
            return;
        }
        let counts = self.tracker.counts();

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "kittens_bot::beliefs",
                Level::DEBUG,
                seat = %ctx.seat(),
                alive = ctx.snapshot.alive_players(),
                cards_remaining = ctx.snapshot.cards_remaining(),
                hazards_removed = counts.hazards_removed,
                skips_played = counts.skips_played,
                defuses_played = counts.defuses_played,
                defuses_in_circulation = counts.defuses_in_circulation(ctx.snapshot.alive_players()),
            );
        }
        self.notify(DecisionRecord::Beliefs {
            seat: ctx.seat(),
            counts,
        });
    }
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn log_play_decision(ctx: &PolicyContext, decision: &TurnDecision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let chosen = decision
        .card
        .map(|card| card.to_string())
        .unwrap_or_else(|| "draw".to_string());

    event!(
        target: "kittens_bot::play",
        Level::INFO,
        seat = %ctx.seat(),
        hand_size = ctx.hand.len(),
        cards_remaining = ctx.snapshot.cards_remaining(),
        alive = ctx.snapshot.alive_players(),
        hazard_probability = f64::from(decision.estimate.probability),
        source = ?decision.estimate.source,
        chosen = %chosen,
        reason = decision.reason.as_str(),
    );
}

fn log_placement(ctx: &PolicyContext, placement: &Placement) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    event!(
        target: "kittens_bot::place",
        Level::INFO,
        seat = %ctx.seat(),
        cards_remaining = ctx.snapshot.cards_remaining(),
        alive = ctx.snapshot.alive_players(),
        defuses_played = ctx.snapshot.defuses_played(),
        position = placement.position,
        rule = placement.rule.as_str(),
    );
}

fn log_peek_reaction(ctx: &PolicyContext, top: &[Card], reaction: &PeekReaction) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let belief = reaction.belief.map(|level| level.as_str()).unwrap_or("none");
    let played = reaction
        .play
        .map(|card| card.to_string())
        .unwrap_or_else(|| "none".to_string());

    event!(
        target: "kittens_bot::peek",
        Level::INFO,
        seat = %ctx.seat(),
        top = %format_cards(top),
        belief,
        played = %played,
    );
}
