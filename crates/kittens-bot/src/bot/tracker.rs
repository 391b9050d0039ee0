use kittens_core::game::snapshot::GameSnapshot;
use kittens_core::model::card::CardKind;

/// Public tallies derived from the played-card history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCounts {
    pub hazards_removed: usize,
    pub skips_played: usize,
    pub defuses_played: usize,
    pub peeks_played: usize,
    pub normals_played: usize,
}

impl HistoryCounts {
    pub fn from_snapshot(snapshot: &GameSnapshot<'_>) -> Self {
        let mut counts = Self::default();
        for played in snapshot.history() {
            match played.card.kind {
                CardKind::ExplodingKitten => counts.hazards_removed += 1,
                CardKind::Skip => counts.skips_played += 1,
                CardKind::Defuse => counts.defuses_played += 1,
                CardKind::SeeTheFuture => counts.peeks_played += 1,
                CardKind::Normal => counts.normals_played += 1,
            }
        }
        counts
    }

    /// Defuses still unaccounted for if every surviving seat started with one.
    pub fn defuses_in_circulation(&self, alive_players: usize) -> usize {
        alive_players.saturating_sub(self.defuses_played)
    }
}

/// Keeps the latest [`HistoryCounts`]. Every observation recounts the whole
/// history, so feeding the same snapshot twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    counts: HistoryCounts,
    observed: usize,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the history grew since the previous observation.
    pub fn observe(&mut self, snapshot: &GameSnapshot<'_>) -> bool {
        let changed = snapshot.history().len() != self.observed;
        self.counts = HistoryCounts::from_snapshot(snapshot);
        self.observed = snapshot.history().len();
        changed
    }

    pub fn counts(&self) -> HistoryCounts {
        self.counts
    }

    pub fn observed(&self) -> usize {
        self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kittens_core::game::snapshot::PlayedCard;
    use kittens_core::model::card::Card;
    use kittens_core::model::seat::SeatId;

    fn history() -> Vec<PlayedCard> {
        let a = SeatId::from_index(0).unwrap();
        let b = SeatId::from_index(1).unwrap();
        vec![
            PlayedCard::new(a, Card::new(1, CardKind::Skip)),
            PlayedCard::new(b, Card::new(2, CardKind::SeeTheFuture)),
            PlayedCard::new(b, Card::new(3, CardKind::Defuse)),
            PlayedCard::new(a, Card::new(4, CardKind::Normal)),
            PlayedCard::new(a, Card::new(5, CardKind::ExplodingKitten)),
        ]
    }

    #[test]
    fn counts_every_kind() {
        let history = history();
        let snapshot = GameSnapshot::new(SeatId::from_index(1).unwrap(), 9, 2, &history);
        let counts = HistoryCounts::from_snapshot(&snapshot);
        assert_eq!(
            counts,
            HistoryCounts {
                hazards_removed: 1,
                skips_played: 1,
                defuses_played: 1,
                peeks_played: 1,
                normals_played: 1,
            }
        );
        assert_eq!(counts.defuses_in_circulation(2), 1);
        assert_eq!(counts.defuses_in_circulation(0), 0);
    }

    #[test]
    fn repeated_observation_is_idempotent() {
        let history = history();
        let snapshot = GameSnapshot::new(SeatId::from_index(0).unwrap(), 9, 2, &history);
        let mut tracker = HistoryTracker::new();
        assert!(tracker.observe(&snapshot));
        let first = tracker.counts();
        assert!(!tracker.observe(&snapshot));
        assert_eq!(tracker.counts(), first);
        assert_eq!(tracker.observed(), 5);
    }
}
