use crate::game::snapshot::{GameSnapshot, PlayedCard};
use crate::model::card::{Card, CardKind};
use crate::model::deck::{Deck, DeckComposition};
use crate::model::hand::Hand;
use crate::model::seat::{MAX_PLAYERS, MIN_PLAYERS, SeatId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    /// No rule effect; the card is simply discarded.
    Discard,
    /// The turn ends without drawing.
    EndTurn,
    /// The player may look at the top three cards.
    Peek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Safe(Card),
    /// A kitten was drawn and neutralised; it waits for [`GameState::reinsert_hazard`].
    Defused { defuse: Card, hazard: Card },
    Exploded { hazard: Card },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    InvalidPlayerCount(usize),
    UnknownSeat(SeatId),
    OutOfTurn { expected: SeatId, actual: SeatId },
    SeatEliminated(SeatId),
    CardNotInHand(Card),
    NotPlayable(Card),
    HazardPending,
    NoPendingHazard,
    EmptyDeck,
    GameOver,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPlayerCount(count) => write!(
                f,
                "games need {MIN_PLAYERS} to {MAX_PLAYERS} players but {count} were requested"
            ),
            GameError::UnknownSeat(seat) => write!(f, "{seat} is not seated at this table"),
            GameError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act but got {actual}")
            }
            GameError::SeatEliminated(seat) => write!(f, "{seat} has already exploded"),
            GameError::CardNotInHand(card) => write!(f, "{card} is not in the acting hand"),
            GameError::NotPlayable(card) => write!(f, "{card} cannot be played voluntarily"),
            GameError::HazardPending => write!(f, "a defused kitten must be reinserted first"),
            GameError::NoPendingHazard => write!(f, "no defused kitten is waiting for reinsertion"),
            GameError::EmptyDeck => write!(f, "the draw pile is empty"),
            GameError::GameOver => write!(f, "the game is already over"),
        }
    }
}

impl std::error::Error for GameError {}

/// Authoritative state of one game. Only the engine mutates it; deciding seats
/// get a [`GameSnapshot`] and a shared reference to their own hand.
#[derive(Debug, Clone)]
pub struct GameState {
    deck: Deck,
    hands: Vec<Hand>,
    alive: Vec<bool>,
    history: Vec<PlayedCard>,
    current: SeatId,
    turn: u32,
    pending_hazard: Option<Card>,
    seed: u64,
}

impl GameState {
    /// Deals a fresh game: every seat gets one defuse plus `hand_size` safe
    /// cards, then `players - 1` kittens and the spare defuses are shuffled in.
    pub fn new(
        players: usize,
        composition: &DeckComposition,
        seed: u64,
    ) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(GameError::InvalidPlayerCount(players));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = Deck::pool(composition);
        deck.shuffle_in_place(&mut rng);

        let mut hands = Vec::with_capacity(players);
        for _ in 0..players {
            let mut hand = Hand::new();
            hand.add(deck.mint(CardKind::Defuse));
            for _ in 0..composition.hand_size {
                match deck.draw() {
                    Some(card) => hand.add(card),
                    None => break,
                }
            }
            hands.push(hand);
        }

        deck.add_fresh(CardKind::ExplodingKitten, players - 1);
        deck.add_fresh(CardKind::Defuse, composition.spare_defuses);
        deck.shuffle_in_place(&mut rng);

        let mut state = Self::from_parts(deck, hands)?;
        state.seed = seed;
        Ok(state)
    }

    /// Builds a game from an explicit pile and hands; seat 0 acts first.
    pub fn from_parts(deck: Deck, hands: Vec<Hand>) -> Result<Self, GameError> {
        let players = hands.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(GameError::InvalidPlayerCount(players));
        }
        let current = SeatId::from_index(0).ok_or(GameError::InvalidPlayerCount(players))?;
        Ok(Self {
            deck,
            alive: vec![true; players],
            hands,
            history: Vec::new(),
            current,
            turn: 0,
            pending_hazard: None,
            seed: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> usize {
        self.hands.len()
    }

    pub fn current_seat(&self) -> SeatId {
        self.current
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// `None` when `seat` is not part of this table.
    pub fn hand(&self, seat: SeatId) -> Option<&Hand> {
        self.hands.get(seat.index())
    }

    pub fn history(&self) -> &[PlayedCard] {
        &self.history
    }

    pub fn pending_hazard(&self) -> Option<Card> {
        self.pending_hazard
    }

    pub fn is_alive(&self, seat: SeatId) -> bool {
        self.alive.get(seat.index()).copied().unwrap_or(false)
    }

    pub fn alive_players(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    pub fn is_over(&self) -> bool {
        self.alive_players() <= 1
    }

    pub fn winner(&self) -> Option<SeatId> {
        if !self.is_over() {
            return None;
        }
        SeatId::all(self.players()).find(|seat| self.is_alive(*seat))
    }

    pub fn snapshot(&self, seat: SeatId) -> GameSnapshot<'_> {
        GameSnapshot::new(seat, self.deck.len(), self.alive_players(), &self.history)
            .with_turn(self.turn)
    }

    /// The next `count` cards, most imminent first.
    pub fn peek(&self, count: usize) -> Vec<Card> {
        self.deck.peek(count).to_vec()
    }

    pub fn play_card(&mut self, seat: SeatId, card: Card) -> Result<CardEffect, GameError> {
        self.ensure_can_act(seat)?;
        if !card.kind.is_playable() {
            return Err(GameError::NotPlayable(card));
        }
        if !self.hands[seat.index()].remove(card) {
            return Err(GameError::CardNotInHand(card));
        }
        self.history.push(PlayedCard::new(seat, card));

        Ok(match card.kind {
            CardKind::Skip => CardEffect::EndTurn,
            CardKind::SeeTheFuture => CardEffect::Peek,
            _ => CardEffect::Discard,
        })
    }

    pub fn draw(&mut self, seat: SeatId) -> Result<DrawOutcome, GameError> {
        self.ensure_can_act(seat)?;
        let card = self.deck.draw().ok_or(GameError::EmptyDeck)?;
        if !card.is_hazard() {
            self.hands[seat.index()].add(card);
            return Ok(DrawOutcome::Safe(card));
        }

        if let Some(defuse) = self.hands[seat.index()].take_kind(CardKind::Defuse) {
            self.history.push(PlayedCard::new(seat, defuse));
            self.pending_hazard = Some(card);
            return Ok(DrawOutcome::Defused {
                defuse,
                hazard: card,
            });
        }

        self.alive[seat.index()] = false;
        self.history.push(PlayedCard::new(seat, card));
        Ok(DrawOutcome::Exploded { hazard: card })
    }

    /// Puts the defused kitten back so it is the `position`-th card drawn.
    /// Returns the position actually used after clamping to the pile.
    pub fn reinsert_hazard(&mut self, position: usize) -> Result<usize, GameError> {
        let hazard = self.pending_hazard.take().ok_or(GameError::NoPendingHazard)?;
        Ok(self.deck.insert_at(position, hazard))
    }

    /// Passes the turn to the next seat that is still in the game.
    pub fn end_turn(&mut self) -> Result<SeatId, GameError> {
        if self.pending_hazard.is_some() {
            return Err(GameError::HazardPending);
        }
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let players = self.players();
        let mut next = self.current.next(players);
        while !self.is_alive(next) {
            next = next.next(players);
        }
        self.current = next;
        self.turn += 1;
        Ok(next)
    }

    fn ensure_can_act(&self, seat: SeatId) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if seat != self.current {
            return Err(GameError::OutOfTurn {
                expected: self.current,
                actual: seat,
            });
        }
        if !self.is_alive(seat) {
            return Err(GameError::SeatEliminated(seat));
        }
        if self.pending_hazard.is_some() {
            return Err(GameError::HazardPending);
        }
        Ok(())
    }
}
