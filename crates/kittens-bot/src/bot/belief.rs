use core::fmt;
use kittens_core::game::snapshot::GameSnapshot;

/// Cards drawn since a peek after which a "probably" belief is forgotten.
const PEEK_WINDOW: usize = 3;

/// Discrete confidence that the next draw is a kitten, ordered from safest to
/// most dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HazardLevel {
    DefinitelyNot,
    Unsure,
    Probably,
    Definitely,
}

impl HazardLevel {
    pub const ALL: [HazardLevel; 4] = [
        HazardLevel::DefinitelyNot,
        HazardLevel::Unsure,
        HazardLevel::Probably,
        HazardLevel::Definitely,
    ];

    pub const fn weight(self) -> f32 {
        match self {
            HazardLevel::DefinitelyNot => 0.0,
            HazardLevel::Unsure => 0.3,
            HazardLevel::Probably => 0.75,
            HazardLevel::Definitely => 1.0,
        }
    }

    /// Levels that pin the probability instead of only raising it.
    pub const fn is_certain(self) -> bool {
        matches!(self, HazardLevel::Definitely | HazardLevel::DefinitelyNot)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            HazardLevel::DefinitelyNot => "definitely_not",
            HazardLevel::Unsure => "unsure",
            HazardLevel::Probably => "probably",
            HazardLevel::Definitely => "definitely",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "definitely_not" | "never" => Some(HazardLevel::DefinitelyNot),
            "unsure" => Some(HazardLevel::Unsure),
            "probably" => Some(HazardLevel::Probably),
            "definitely" | "certain" => Some(HazardLevel::Definitely),
            _ => None,
        }
    }
}

impl fmt::Display for HazardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a peek taught us, pinned to the pile it was made against: its size and
/// the number of kittens defused (and so reinserted) so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekBelief {
    pub level: HazardLevel,
    pub observed_at: usize,
    pub reinsertions: usize,
}

impl PeekBelief {
    pub const fn new(level: HazardLevel, observed_at: usize, reinsertions: usize) -> Self {
        Self {
            level,
            observed_at,
            reinsertions,
        }
    }

    pub fn observe(level: HazardLevel, snapshot: &GameSnapshot<'_>) -> Self {
        Self::new(level, snapshot.cards_remaining(), snapshot.defuses_played())
    }

    /// Certain beliefs only describe the very next card, so any draw voids them.
    /// A "probably" belief covers the peeked window until it has been drawn through.
    /// A kitten put back into the pile reorders it, which voids every belief.
    pub fn is_current(&self, snapshot: &GameSnapshot<'_>) -> bool {
        let cards_remaining = snapshot.cards_remaining();
        if snapshot.defuses_played() != self.reinsertions || cards_remaining > self.observed_at {
            return false;
        }
        let drawn = self.observed_at - cards_remaining;
        match self.level {
            HazardLevel::Probably => drawn < PEEK_WINDOW,
            _ => drawn == 0,
        }
    }
}

/// Scratch state a policy carries between decisions of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentMemory {
    peek: Option<PeekBelief>,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, belief: PeekBelief) {
        self.peek = Some(belief);
    }

    pub fn forget(&mut self) {
        self.peek = None;
    }

    pub fn peek_belief(&self) -> Option<PeekBelief> {
        self.peek
    }

    /// Level of the stored belief if it still applies to the pile in `snapshot`.
    pub fn current(&self, snapshot: &GameSnapshot<'_>) -> Option<HazardLevel> {
        self.peek
            .filter(|belief| belief.is_current(snapshot))
            .map(|belief| belief.level)
    }

    /// Drops the stored belief once the pile has moved past it.
    pub fn refresh(&mut self, snapshot: &GameSnapshot<'_>) {
        if self.current(snapshot).is_none() {
            self.peek = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimateSource {
    Counting,
    Belief(HazardLevel),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardEstimate {
    pub probability: f32,
    pub source: EstimateSource,
}

impl HazardEstimate {
    /// Chance that the next draw explodes: one kitten per opponent still in
    /// play spread over the pile, unless a live peek belief says otherwise.
    pub fn compute(snapshot: &GameSnapshot<'_>, belief: Option<HazardLevel>) -> Self {
        let kittens = snapshot.alive_players().saturating_sub(1) as f32;
        let cards = snapshot.cards_remaining().max(1) as f32;
        let counted = (kittens / cards).clamp(0.0, 1.0);

        match belief {
            Some(level) if level.is_certain() => Self {
                probability: level.weight(),
                source: EstimateSource::Belief(level),
            },
            Some(level) if level.weight() > counted => Self {
                probability: level.weight(),
                source: EstimateSource::Belief(level),
            },
            _ => Self {
                probability: counted,
                source: EstimateSource::Counting,
            },
        }
    }

    pub fn exceeds(&self, threshold: HazardLevel) -> bool {
        self.probability > threshold.weight()
    }
}
