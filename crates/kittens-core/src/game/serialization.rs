use super::snapshot::{GameSnapshot, PlayedCard};
use crate::model::seat::SeatId;
use serde::{Deserialize, Serialize};

/// Owned, serializable copy of a [`GameSnapshot`], used to capture the exact
/// inputs of a decision and replay it later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    pub seat: SeatId,
    pub cards_remaining: usize,
    pub alive_players: usize,
    pub turn: u32,
    #[serde(default)]
    pub history: Vec<PlayedCard>,
}

impl SnapshotRecord {
    pub fn capture(snapshot: &GameSnapshot<'_>) -> Self {
        SnapshotRecord {
            seat: snapshot.seat(),
            cards_remaining: snapshot.cards_remaining(),
            alive_players: snapshot.alive_players(),
            turn: snapshot.turn(),
            history: snapshot.history().to_vec(),
        }
    }

    pub fn view(&self) -> GameSnapshot<'_> {
        GameSnapshot::new(
            self.seat,
            self.cards_remaining,
            self.alive_players,
            &self.history,
        )
        .with_turn(self.turn)
    }

    pub fn to_json(snapshot: &GameSnapshot<'_>) -> serde_json::Result<String> {
        let record = Self::capture(snapshot);
        serde_json::to_string_pretty(&record)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotRecord;
    use crate::game::state::GameState;
    use crate::model::card::CardKind;
    use crate::model::deck::DeckComposition;
    use crate::model::seat::SeatId;

    #[test]
    fn snapshot_serializes_to_json() {
        let state = GameState::new(3, &DeckComposition::default(), 99).unwrap();
        let seat = SeatId::from_index(0).unwrap();
        let json = SnapshotRecord::to_json(&state.snapshot(seat)).unwrap();
        assert!(json.contains("\"seat\": 0"));
        assert!(json.contains("\"alive_players\": 3"));
        assert!(json.contains("\"history\": []"));
    }

    #[test]
    fn record_roundtrip_restores_view() {
        let mut state = GameState::new(2, &DeckComposition::default(), 5).unwrap();
        let seat = state.current_seat();
        let normal = state
            .hand(seat)
            .unwrap()
            .iter()
            .copied()
            .find(|card| card.kind == CardKind::Normal);
        if let Some(card) = normal {
            state.play_card(seat, card).unwrap();
        }

        let json = SnapshotRecord::to_json(&state.snapshot(seat)).unwrap();
        let record = SnapshotRecord::from_json(&json).unwrap();
        let view = record.view();
        assert_eq!(view.cards_remaining(), state.deck().len());
        assert_eq!(view.history(), state.history());
        assert_eq!(view.played_count(CardKind::Normal), state.history().len());
    }

    #[test]
    fn missing_history_defaults_to_empty() {
        let record = SnapshotRecord::from_json(
            r#"{"seat":1,"cards_remaining":4,"alive_players":2,"turn":3}"#,
        )
        .unwrap();
        assert!(record.history.is_empty());
        assert_eq!(record.view().turn(), 3);
    }
}
