use crate::model::card::{Card, CardKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

const DEFAULT_NORMAL: usize = 24;
const DEFAULT_SKIP: usize = 8;
const DEFAULT_SEE_THE_FUTURE: usize = 6;
const DEFAULT_SPARE_DEFUSES: usize = 2;
const DEFAULT_HAND_SIZE: usize = 7;

/// Card counts used to build the draw pile for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckComposition {
    pub normal: usize,
    pub skip: usize,
    pub see_the_future: usize,
    /// Defuses shuffled into the pile on top of the one dealt to every seat.
    pub spare_defuses: usize,
    /// Non-defuse cards dealt to each seat before kittens are added.
    pub hand_size: usize,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            normal: DEFAULT_NORMAL,
            skip: DEFAULT_SKIP,
            see_the_future: DEFAULT_SEE_THE_FUTURE,
            spare_defuses: DEFAULT_SPARE_DEFUSES,
            hand_size: DEFAULT_HAND_SIZE,
        }
    }
}

impl DeckComposition {
    pub fn pool_size(&self) -> usize {
        self.normal + self.skip + self.see_the_future
    }
}

/// Draw pile. Index 0 is the top of the deck, i.e. the next card drawn.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
    minted: u16,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the unshuffled pool of safe action cards described by `composition`.
    pub fn pool(composition: &DeckComposition) -> Self {
        let mut deck = Self::new();
        deck.add_fresh(CardKind::Normal, composition.normal);
        deck.add_fresh(CardKind::Skip, composition.skip);
        deck.add_fresh(CardKind::SeeTheFuture, composition.see_the_future);
        deck
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let minted = cards
            .iter()
            .map(|card| card.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self { cards, minted }
    }

    /// Creates a new card with an id unique within this deck's lifetime.
    /// The card is not placed in the pile.
    pub fn mint(&mut self, kind: CardKind) -> Card {
        let card = Card::new(self.minted, kind);
        self.minted = self.minted.wrapping_add(1);
        card
    }

    pub fn add_fresh(&mut self, kind: CardKind, count: usize) {
        for _ in 0..count {
            let card = self.mint(kind);
            self.cards.push(card);
        }
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn shuffled_with_seed(composition: &DeckComposition, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = Self::pool(composition);
        deck.shuffle_in_place(&mut rng);
        deck
    }

    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// The next `count` cards, most imminent first.
    pub fn peek(&self, count: usize) -> &[Card] {
        &self.cards[..count.min(self.cards.len())]
    }

    /// Inserts `card` so that it becomes the `position`-th card drawn.
    /// Positions past the bottom are clamped to the bottom.
    pub fn insert_at(&mut self, position: usize, card: Card) -> usize {
        let position = position.min(self.cards.len());
        self.cards.insert(position, card);
        position
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|card| card.kind == kind).count()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
