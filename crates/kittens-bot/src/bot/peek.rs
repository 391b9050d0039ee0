use super::belief::HazardLevel;
use kittens_core::model::card::{Card, CardKind};
use kittens_core::model::hand::Hand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekReaction {
    /// Card to play right away, if any.
    pub play: Option<Card>,
    /// What the peek says about the next draw. `None` when nothing was shown.
    pub belief: Option<HazardLevel>,
}

pub struct PeekPlanner;

impl PeekPlanner {
    /// Reacts to the upcoming cards, most imminent first.
    pub fn react(hand: &Hand, top: &[Card]) -> PeekReaction {
        let Some(first_hazard) = top.iter().position(|card| card.is_hazard()) else {
            let belief = (!top.is_empty()).then_some(HazardLevel::DefinitelyNot);
            return PeekReaction { play: None, belief };
        };

        if first_hazard == 0 {
            let skip = hand.iter().copied().find(|card| card.is(CardKind::Skip));
            return PeekReaction {
                play: skip,
                belief: Some(HazardLevel::Definitely),
            };
        }

        PeekReaction {
            play: None,
            belief: Some(HazardLevel::Probably),
        }
    }
}
