use super::BotContext;
use super::belief::HazardEstimate;
use kittens_core::model::card::{Card, CardKind};
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnReason {
    Peek,
    AvoidDraw,
    DiscardNormal,
    Draw,
}

impl TurnReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            TurnReason::Peek => "peek",
            TurnReason::AvoidDraw => "avoid_draw",
            TurnReason::DiscardNormal => "discard_normal",
            TurnReason::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnDecision {
    pub card: Option<Card>,
    pub estimate: HazardEstimate,
    pub reason: TurnReason,
}

pub struct TurnPlanner;

impl TurnPlanner {
    /// Picks the next card to put down this turn, or `None` to draw.
    pub fn choose<R: Rng + ?Sized>(ctx: &BotContext<'_>, rng: &mut R) -> TurnDecision {
        let estimate = ctx.hazard_estimate();
        let hand = ctx.hand;

        if let Some(peek) = hand.iter().copied().find(|card| card.is(CardKind::SeeTheFuture)) {
            return TurnDecision {
                card: Some(peek),
                estimate,
                reason: TurnReason::Peek,
            };
        }

        if estimate.exceeds(ctx.params.skip_threshold) {
            if let Some(skip) = hand.iter().copied().find(|card| card.is(CardKind::Skip)) {
                return TurnDecision {
                    card: Some(skip),
                    estimate,
                    reason: TurnReason::AvoidDraw,
                };
            }
        }

        let normals = hand.of_kind(CardKind::Normal);
        if let Some(normal) = normals.choose(rng).copied() {
            return TurnDecision {
                card: Some(normal),
                estimate,
                reason: TurnReason::DiscardNormal,
            };
        }

        TurnDecision {
            card: None,
            estimate,
            reason: TurnReason::Draw,
        }
    }
}
