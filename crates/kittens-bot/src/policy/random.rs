use super::observer::{DecisionObserver, DecisionRecord};
use super::{Policy, PolicyContext};
use kittens_core::model::card::{Card, CardKind};
use kittens_core::model::hand::Hand;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// Baseline opponent: fixed priority list, uniform picks inside each tier and
/// uniform kitten placement. Ignores the public history.
pub struct RandomPolicy<R: Rng = SmallRng> {
    rng: R,
    observer: Option<Box<dyn DecisionObserver>>,
}

impl RandomPolicy<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for RandomPolicy<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, observer: None }
    }

    pub fn with_observer(mut self, observer: Box<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn pick(&mut self, hand: &Hand, kind: CardKind) -> Option<Card> {
        hand.of_kind(kind).choose(&mut self.rng).copied()
    }

    fn notify(&mut self, record: DecisionRecord) {
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&record);
        }
    }
}

impl<R: Rng + Send> Policy for RandomPolicy<R> {
    fn play_turn(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let hand = ctx.hand;
        let (chosen, reason) = if hand.has(CardKind::Defuse) {
            let playable: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|card| card.kind.is_playable())
                .collect();
            (playable.choose(&mut self.rng).copied(), "covered")
        } else if let Some(peek) = self.pick(hand, CardKind::SeeTheFuture) {
            (Some(peek), "peek")
        } else if let Some(skip) = self.pick(hand, CardKind::Skip) {
            (Some(skip), "skip")
        } else {
            (self.pick(hand, CardKind::Normal), "normal")
        };

        event!(
            target: "kittens_bot::play",
            Level::DEBUG,
            seat = %ctx.seat(),
            policy = "random",
            chosen = ?chosen,
            reason,
        );
        self.notify(DecisionRecord::Play {
            seat: ctx.seat(),
            hazard_probability: 0.0,
            chosen,
            reason,
        });
        chosen
    }

    fn place_hazard(&mut self, ctx: &PolicyContext) -> usize {
        let cards = ctx.snapshot.cards_remaining();
        let position = if cards == 0 {
            0
        } else {
            self.rng.gen_range(0..cards)
        };

        self.notify(DecisionRecord::Placement {
            seat: ctx.seat(),
            cards_remaining: cards,
            position,
            rule: None,
        });
        position
    }

    fn react_to_peek(&mut self, ctx: &PolicyContext, top: &[Card]) -> Option<Card> {
        let reaction = if top.iter().any(|card| card.is_hazard()) {
            self.pick(ctx.hand, CardKind::Skip)
        } else {
            None
        };

        self.notify(DecisionRecord::Peek {
            seat: ctx.seat(),
            top: top.to_vec(),
            reaction,
            belief: None,
        });
        reaction
    }
}
