use crate::model::card::{Card, CardKind};
use crate::model::seat::SeatId;
use serde::{Deserialize, Serialize};

/// A card that left a hand and became public knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub seat: SeatId,
    pub card: Card,
}

impl PlayedCard {
    pub const fn new(seat: SeatId, card: Card) -> Self {
        Self { seat, card }
    }
}

/// Read-only view of the public game state handed to a deciding seat.
#[derive(Debug, Clone, Copy)]
pub struct GameSnapshot<'a> {
    seat: SeatId,
    cards_remaining: usize,
    alive_players: usize,
    turn: u32,
    history: &'a [PlayedCard],
}

impl<'a> GameSnapshot<'a> {
    pub fn new(
        seat: SeatId,
        cards_remaining: usize,
        alive_players: usize,
        history: &'a [PlayedCard],
    ) -> Self {
        Self {
            seat,
            cards_remaining,
            alive_players,
            turn: 0,
            history,
        }
    }

    pub fn with_turn(mut self, turn: u32) -> Self {
        self.turn = turn;
        self
    }

    pub fn seat(&self) -> SeatId {
        self.seat
    }

    pub fn cards_remaining(&self) -> usize {
        self.cards_remaining
    }

    pub fn alive_players(&self) -> usize {
        self.alive_players
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn history(&self) -> &'a [PlayedCard] {
        self.history
    }

    pub fn played_count(&self, kind: CardKind) -> usize {
        self.history
            .iter()
            .filter(|played| played.card.kind == kind)
            .count()
    }

    pub fn defuses_played(&self) -> usize {
        self.played_count(CardKind::Defuse)
    }

    /// Kittens that exploded and left the game together with their victim.
    pub fn hazards_removed(&self) -> usize {
        self.played_count(CardKind::ExplodingKitten)
    }
}
