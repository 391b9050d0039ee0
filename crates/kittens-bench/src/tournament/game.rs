use std::time::{Duration, Instant};

use kittens_bot::policy::{Policy, PolicyContext};
use kittens_core::game::state::{CardEffect, DrawOutcome, GameError, GameState};
use kittens_core::model::card::Card;
use kittens_core::model::seat::SeatId;
use tracing::{Level, event};

use super::RunnerError;

/// Hard stop for a single game; a finite deck always ends well before this.
pub const MAX_TURNS: u32 = 2_000;
const PEEK_DEPTH: usize = 3;

/// How a single turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    Skipped,
    Drew,
    Defused { position: usize },
    Exploded,
}

impl TurnEnd {
    pub const fn as_str(self) -> &'static str {
        match self {
            TurnEnd::Skipped => "skipped",
            TurnEnd::Drew => "drew",
            TurnEnd::Defused { .. } => "defused",
            TurnEnd::Exploded => "exploded",
        }
    }
}

/// One agent sitting at the table for the length of a game.
pub struct SeatState {
    pub seat: SeatId,
    pub agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
    pub cards_played: u32,
    pub defuses_used: u32,
    pub eliminated_at: Option<u32>,
}

impl SeatState {
    pub fn new(seat: SeatId, agent_name: impl Into<String>, policy: Box<dyn Policy>) -> Self {
        Self {
            seat,
            agent_name: agent_name.into(),
            policy,
            metrics: DecisionMetrics::default(),
            cards_played: 0,
            defuses_used: 0,
            eliminated_at: None,
        }
    }

    pub fn metrics(&self) -> DecisionSummary {
        self.metrics.summary()
    }

    fn context<'s>(&self, state: &'s GameState) -> Result<PolicyContext<'s>, RunnerError> {
        let hand = state.hand(self.seat).ok_or(GameError::UnknownSeat(self.seat))?;
        Ok(PolicyContext::new(hand, state.snapshot(self.seat)))
    }

    fn observe(&mut self, state: &GameState) -> Result<(), RunnerError> {
        let ctx = self.context(state)?;
        self.policy.update_beliefs(&ctx);
        Ok(())
    }

    fn decide_play(&mut self, state: &GameState) -> Result<Option<Card>, RunnerError> {
        let ctx = self.context(state)?;
        let start = Instant::now();
        let card = self.policy.play_turn(&ctx);
        self.metrics.record(start.elapsed());
        Ok(card)
    }

    fn decide_peek(&mut self, state: &GameState, top: &[Card]) -> Result<Option<Card>, RunnerError> {
        let ctx = self.context(state)?;
        let start = Instant::now();
        let card = self.policy.react_to_peek(&ctx, top);
        self.metrics.record(start.elapsed());
        Ok(card)
    }

    fn decide_placement(&mut self, state: &GameState) -> Result<usize, RunnerError> {
        let ctx = self.context(state)?;
        let start = Instant::now();
        let position = self.policy.place_hazard(&ctx);
        self.metrics.record(start.elapsed());
        Ok(position)
    }
}

/// Final state of a finished (or capped) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnd {
    pub winner: Option<SeatId>,
    pub turns: u32,
    pub capped: bool,
}

/// Runs policies against the engine, one synchronous decision at a time.
pub struct GameDriver<'a> {
    pub run_id: &'a str,
    pub game_index: usize,
    pub permutation_index: usize,
    pub logging_enabled: bool,
}

impl GameDriver<'_> {
    pub fn play(
        &self,
        state: &mut GameState,
        seats: &mut [SeatState],
    ) -> Result<GameEnd, RunnerError> {
        let mut capped = false;

        while !state.is_over() {
            if state.turn() >= MAX_TURNS {
                capped = true;
                break;
            }

            let current = state.current_seat();
            let seat = seats
                .get_mut(current.index())
                .ok_or_else(|| RunnerError::game(format!("no agent seated at {current}")))?;

            let start = Instant::now();
            let end = play_turn(state, seat)?;
            self.log_turn(state, seat, end, start.elapsed());

            if state.is_over() {
                break;
            }
            state.end_turn()?;
        }

        Ok(GameEnd {
            winner: state.winner(),
            turns: state.turn(),
            capped,
        })
    }

    fn log_turn(&self, state: &GameState, seat: &SeatState, end: TurnEnd, elapsed: Duration) {
        if !self.logging_enabled || !tracing::enabled!(Level::INFO) {
            return;
        }

        let position = match end {
            TurnEnd::Defused { position } => position as i64,
            _ => -1,
        };

        event!(
            target: "kittens_bench::turn",
            Level::INFO,
            run_id = %self.run_id,
            game_index = self.game_index as u32,
            permutation_index = self.permutation_index as u32,
            turn = state.turn(),
            seat = %seat.seat,
            agent = %seat.agent_name,
            outcome = end.as_str(),
            position,
            cards_remaining = state.deck().len(),
            alive = state.alive_players(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        );
    }
}

/// Plays cards until the policy stops (or a skip ends the turn), then draws.
pub fn play_turn(state: &mut GameState, seat: &mut SeatState) -> Result<TurnEnd, RunnerError> {
    seat.observe(state)?;

    let mut next = seat.decide_play(state)?;
    while let Some(card) = next {
        let effect = state.play_card(seat.seat, card)?;
        seat.cards_played += 1;

        next = match effect {
            CardEffect::EndTurn => return Ok(TurnEnd::Skipped),
            CardEffect::Peek => {
                let top = state.peek(PEEK_DEPTH);
                match seat.decide_peek(state, &top)? {
                    Some(reaction) => Some(reaction),
                    None => seat.decide_play(state)?,
                }
            }
            CardEffect::Discard => seat.decide_play(state)?,
        };
    }

    match state.draw(seat.seat)? {
        DrawOutcome::Safe(_) => Ok(TurnEnd::Drew),
        DrawOutcome::Defused { .. } => {
            let requested = seat.decide_placement(state)?;
            let position = state.reinsert_hazard(requested)?;
            seat.defuses_used += 1;
            Ok(TurnEnd::Defused { position })
        }
        DrawOutcome::Exploded { .. } => {
            seat.eliminated_at = Some(state.turn());
            Ok(TurnEnd::Exploded)
        }
    }
}

#[derive(Debug, Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn summary(&self) -> DecisionSummary {
        let total_ms = self.total.as_secs_f64() * 1000.0;
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            total_ms / f64::from(self.decisions)
        };
        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kittens_bot::policy::{HeuristicPolicy, RandomPolicy};
    use kittens_core::model::card::CardKind;
    use kittens_core::model::deck::{Deck, DeckComposition};
    use kittens_core::model::hand::Hand;

    fn seat(index: usize) -> SeatId {
        SeatId::from_index(index).unwrap()
    }

    fn heuristic(index: usize) -> SeatState {
        SeatState::new(
            seat(index),
            format!("h{index}"),
            Box::new(HeuristicPolicy::from_seed(index as u64)),
        )
    }

    #[test]
    fn skip_ends_turn_without_drawing() {
        let deck = Deck::from_cards(vec![
            Card::new(10, CardKind::ExplodingKitten),
            Card::new(11, CardKind::Normal),
        ]);
        let hands = vec![
            Hand::with_cards(vec![Card::new(1, CardKind::Skip)]),
            Hand::new(),
        ];
        let mut state = GameState::from_parts(deck, hands).unwrap();
        let mut seat0 = heuristic(0);

        // one kitten over two cards is above the default threshold
        assert_eq!(play_turn(&mut state, &mut seat0).unwrap(), TurnEnd::Skipped);
        assert_eq!(state.deck().len(), 2);
        assert!(state.hand(seat(0)).unwrap().is_empty());
        assert_eq!(seat0.cards_played, 1);
    }

    #[test]
    fn peek_reaction_skips_imminent_kitten() {
        let deck = Deck::from_cards(vec![
            Card::new(10, CardKind::ExplodingKitten),
            Card::new(11, CardKind::Normal),
            Card::new(12, CardKind::Normal),
            Card::new(13, CardKind::Normal),
            Card::new(14, CardKind::Normal),
            Card::new(15, CardKind::Normal),
        ]);
        let hands = vec![
            Hand::with_cards(vec![
                Card::new(1, CardKind::SeeTheFuture),
                Card::new(2, CardKind::Skip),
            ]),
            Hand::new(),
        ];
        let mut state = GameState::from_parts(deck, hands).unwrap();
        let mut seat0 = heuristic(0);

        assert_eq!(play_turn(&mut state, &mut seat0).unwrap(), TurnEnd::Skipped);
        let kinds: Vec<CardKind> = state.history().iter().map(|p| p.card.kind).collect();
        assert_eq!(kinds, vec![CardKind::SeeTheFuture, CardKind::Skip]);
        assert_eq!(state.deck().len(), 6);
    }

    #[test]
    fn defused_kitten_goes_where_the_policy_says() {
        let deck = Deck::from_cards(
            std::iter::once(Card::new(10, CardKind::ExplodingKitten))
                .chain((11..31).map(|id| Card::new(id, CardKind::Normal)))
                .collect(),
        );
        let hands = vec![
            Hand::with_cards(vec![Card::new(1, CardKind::Defuse)]),
            Hand::new(),
        ];
        let mut state = GameState::from_parts(deck, hands).unwrap();
        let mut seat0 = heuristic(0);

        // 20 cards left, two players, one defuse already used: early strike at 20 / 4
        let end = play_turn(&mut state, &mut seat0).unwrap();
        assert_eq!(end, TurnEnd::Defused { position: 5 });
        assert_eq!(state.deck().cards()[5].kind, CardKind::ExplodingKitten);
        assert_eq!(seat0.defuses_used, 1);
        assert_eq!(seat0.metrics().decisions, 2);
    }

    #[test]
    fn reinserted_kitten_does_not_revive_an_old_peek() {
        let deck = Deck::from_cards(
            std::iter::once(Card::new(10, CardKind::ExplodingKitten))
                .chain((11..23).map(|id| Card::new(id, CardKind::Normal)))
                .collect(),
        );
        let hands = vec![
            Hand::with_cards(vec![
                Card::new(1, CardKind::SeeTheFuture),
                Card::new(2, CardKind::Skip),
                Card::new(3, CardKind::Skip),
                Card::new(4, CardKind::Normal),
            ]),
            Hand::with_cards(vec![Card::new(5, CardKind::Defuse)]),
        ];
        let mut state = GameState::from_parts(deck, hands).unwrap();
        let mut seat0 = heuristic(0);
        let mut seat1 = heuristic(1);

        // peek shows the kitten on top, so a skip goes out
        assert_eq!(play_turn(&mut state, &mut seat0).unwrap(), TurnEnd::Skipped);
        state.end_turn().unwrap();

        // heads-up with one defuse spent: 12 / 4
        assert_eq!(
            play_turn(&mut state, &mut seat1).unwrap(),
            TurnEnd::Defused { position: 3 }
        );
        assert_eq!(state.deck().len(), 13);
        state.end_turn().unwrap();

        // Same pile size as at the peek, but the top card is now safe.
        assert_eq!(play_turn(&mut state, &mut seat0).unwrap(), TurnEnd::Drew);
        assert!(state.hand(seat(0)).unwrap().has(CardKind::Skip));
        let last_played = state.history().last().map(|played| played.card.kind);
        assert_eq!(last_played, Some(CardKind::Normal));
    }

    #[test]
    fn undefended_kitten_eliminates() {
        let deck = Deck::from_cards(vec![Card::new(10, CardKind::ExplodingKitten)]);
        let hands = vec![Hand::new(), Hand::new()];
        let mut state = GameState::from_parts(deck, hands).unwrap();
        let mut seat0 = heuristic(0);

        assert_eq!(play_turn(&mut state, &mut seat0).unwrap(), TurnEnd::Exploded);
        assert_eq!(seat0.eliminated_at, Some(0));
        assert_eq!(state.winner(), Some(seat(1)));
    }

    #[test]
    fn agent_outside_the_table_is_an_error() {
        let deck = Deck::from_cards(vec![Card::new(10, CardKind::Normal)]);
        let mut state = GameState::from_parts(deck, vec![Hand::new(), Hand::new()]).unwrap();
        let mut stray = heuristic(4);

        let err = play_turn(&mut state, &mut stray).unwrap_err();
        assert!(matches!(err, RunnerError::Rules(GameError::UnknownSeat(_))));
        assert_eq!(state.deck().len(), 1);
    }

    #[test]
    fn full_games_finish_with_a_winner() {
        let composition = DeckComposition::default();
        for players in 2..=5 {
            for game_seed in 0..8u64 {
                let mut state = GameState::new(players, &composition, game_seed).unwrap();
                let mut seats: Vec<SeatState> = (0..players)
                    .map(|index| {
                        let policy: Box<dyn Policy> = if index % 2 == 0 {
                            Box::new(HeuristicPolicy::from_seed(game_seed + index as u64))
                        } else {
                            Box::new(RandomPolicy::from_seed(game_seed + index as u64))
                        };
                        SeatState::new(seat(index), format!("a{index}"), policy)
                    })
                    .collect();
                let driver = GameDriver {
                    run_id: "test",
                    game_index: game_seed as usize,
                    permutation_index: 0,
                    logging_enabled: false,
                };

                let end = driver.play(&mut state, &mut seats).unwrap();
                assert!(!end.capped);
                let winner = end.winner.expect("a survivor");
                assert!(seats[winner.index()].eliminated_at.is_none());
                let eliminated = seats.iter().filter(|s| s.eliminated_at.is_some()).count();
                assert_eq!(eliminated, players - 1);
            }
        }
    }
}
