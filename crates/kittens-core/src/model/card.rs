use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CardKind {
    Normal = 0,
    Skip = 1,
    SeeTheFuture = 2,
    Defuse = 3,
    ExplodingKitten = 4,
}

impl CardKind {
    pub const ALL: [CardKind; 5] = [
        CardKind::Normal,
        CardKind::Skip,
        CardKind::SeeTheFuture,
        CardKind::Defuse,
        CardKind::ExplodingKitten,
    ];

    pub const fn is_hazard(self) -> bool {
        matches!(self, CardKind::ExplodingKitten)
    }

    /// Whether a player may put this card down voluntarily during their turn.
    /// Defuses are only spent when a kitten is drawn.
    pub const fn is_playable(self) -> bool {
        !matches!(self, CardKind::Defuse | CardKind::ExplodingKitten)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardKind::Normal => "normal",
            CardKind::Skip => "skip",
            CardKind::SeeTheFuture => "see_the_future",
            CardKind::Defuse => "defuse",
            CardKind::ExplodingKitten => "exploding_kitten",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(CardKind::Normal),
            "skip" => Some(CardKind::Skip),
            "see_the_future" | "peek" => Some(CardKind::SeeTheFuture),
            "defuse" => Some(CardKind::Defuse),
            "exploding_kitten" | "kitten" | "hazard" => Some(CardKind::ExplodingKitten),
            _ => None,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCardKind(pub String);

impl fmt::Display for UnknownCardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown card kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownCardKind {}

impl FromStr for CardKind {
    type Err = UnknownCardKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownCardKind(value.to_string()))
    }
}

/// A single physical card. Cards of the same kind behave identically; the id
/// only distinguishes copies so the engine can remove the exact one chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: u16,
    pub kind: CardKind,
}

impl Card {
    pub const fn new(id: u16, kind: CardKind) -> Self {
        Self { id, kind }
    }

    pub const fn is(self, kind: CardKind) -> bool {
        self.kind as u8 == kind as u8
    }

    pub const fn is_hazard(self) -> bool {
        self.kind.is_hazard()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardKind};

    #[test]
    fn only_kitten_is_hazard() {
        for kind in CardKind::ALL {
            assert_eq!(kind.is_hazard(), kind == CardKind::ExplodingKitten);
        }
    }

    #[test]
    fn defuse_and_kitten_are_not_playable() {
        assert!(CardKind::Normal.is_playable());
        assert!(CardKind::Skip.is_playable());
        assert!(CardKind::SeeTheFuture.is_playable());
        assert!(!CardKind::Defuse.is_playable());
        assert!(!CardKind::ExplodingKitten.is_playable());
    }

    #[test]
    fn labels_parse_case_insensitive() {
        assert_eq!(CardKind::from_label("SKIP"), Some(CardKind::Skip));
        assert_eq!(CardKind::from_label(" peek "), Some(CardKind::SeeTheFuture));
        assert_eq!(CardKind::from_label("hazard"), Some(CardKind::ExplodingKitten));
        assert_eq!(CardKind::from_label("attack"), None);
        assert_eq!("defuse".parse::<CardKind>(), Ok(CardKind::Defuse));
        assert_eq!(
            "attack".parse::<CardKind>(),
            Err(super::UnknownCardKind("attack".to_string()))
        );
        for kind in CardKind::ALL {
            assert_eq!(CardKind::from_label(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn display_includes_kind_and_id() {
        let card = Card::new(7, CardKind::Defuse);
        assert_eq!(card.to_string(), "defuse#7");
        assert!(card.is(CardKind::Defuse));
        assert!(!card.is_hazard());
    }
}
