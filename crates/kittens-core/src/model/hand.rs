use crate::model::card::{Card, CardKind};
use std::vec::Vec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes the first card of `kind`, returning it.
    pub fn take_kind(&mut self, kind: CardKind) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.kind == kind)?;
        Some(self.cards.remove(index))
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has(&self, kind: CardKind) -> bool {
        self.cards.iter().any(|card| card.kind == kind)
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|card| card.kind == kind).count()
    }

    pub fn of_kind(&self, kind: CardKind) -> Vec<Card> {
        self.cards
            .iter()
            .copied()
            .filter(|card| card.kind == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
