use super::belief::HazardLevel;

/// Tunable constants for the heuristic planners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Skip instead of drawing when the estimated risk is strictly above this level (default: Unsure).
    pub skip_threshold: HazardLevel,

    /// Piles strictly larger than this are "large" for placement (default: 10)
    pub large_deck: usize,

    /// Max distance from the middle when spreading a kitten (default: 2)
    pub middle_jitter: u8,

    /// Offset from the bottom used in a two player game (default: 3)
    pub duel_offset: usize,

    /// Piles of this size or smaller always get the kitten at the bottom (default: 5)
    pub endgame_deck: usize,

    /// Below this many defuses left in circulation the kitten goes in early (default: 2)
    pub min_circulating_defuses: usize,

    /// Early placement lands at `cards / early_divisor` (default: 4)
    pub early_divisor: usize,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            skip_threshold: HazardLevel::Unsure,
            large_deck: 10,
            middle_jitter: 2,
            duel_offset: 3,
            endgame_deck: 5,
            min_circulating_defuses: 2,
            early_divisor: 4,
        }
    }
}

impl BotParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let skip_threshold = read("KITTENS_SKIP_THRESHOLD")
            .and_then(|raw| HazardLevel::from_label(&raw))
            .unwrap_or(defaults.skip_threshold);

        let middle_jitter = read("KITTENS_PLACE_JITTER")
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .filter(|value| *value <= 10)
            .unwrap_or(defaults.middle_jitter);

        Self {
            skip_threshold,
            middle_jitter,
            ..defaults
        }
    }
}
