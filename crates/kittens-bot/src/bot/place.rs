use super::params::BotParams;
use kittens_core::game::snapshot::GameSnapshot;
use rand::Rng;

/// Which rule produced the final kitten position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRule {
    Bottom,
    SpreadMiddle,
    Duel,
    EarlyStrike,
    Endgame,
}

impl PlacementRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlacementRule::Bottom => "bottom",
            PlacementRule::SpreadMiddle => "spread_middle",
            PlacementRule::Duel => "duel",
            PlacementRule::EarlyStrike => "early_strike",
            PlacementRule::Endgame => "endgame",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: usize,
    pub rule: PlacementRule,
}

pub struct PlacementPlanner;

impl PlacementPlanner {
    /// Position (0 = next drawn) for a defused kitten. Later rules override
    /// earlier ones; the result always lies in `[0, cards_remaining - 1]`.
    pub fn choose<R: Rng + ?Sized>(
        snapshot: &GameSnapshot<'_>,
        params: &BotParams,
        rng: &mut R,
    ) -> Placement {
        let cards = snapshot.cards_remaining();
        let alive = snapshot.alive_players();
        let span = cards.max(1);
        let bottom = span - 1;

        let mut placement = Placement {
            position: bottom,
            rule: PlacementRule::Bottom,
        };

        if cards > params.large_deck && alive > 2 {
            let jitter = i64::from(params.middle_jitter);
            let offset = rng.gen_range(-jitter..=jitter);
            let middle = (span / 2) as i64 + offset;
            placement = Placement {
                position: middle.max(0) as usize,
                rule: PlacementRule::SpreadMiddle,
            };
        } else if alive == 2 {
            placement = Placement {
                position: span.saturating_sub(params.duel_offset),
                rule: PlacementRule::Duel,
            };
        }

        let circulating = alive.saturating_sub(snapshot.defuses_played());
        if circulating < params.min_circulating_defuses {
            placement = Placement {
                position: (span / params.early_divisor.max(1)).max(1),
                rule: PlacementRule::EarlyStrike,
            };
        }

        if cards <= params.endgame_deck {
            placement = Placement {
                position: bottom,
                rule: PlacementRule::Endgame,
            };
        }

        placement.position = placement.position.min(bottom);
        placement
    }
}
