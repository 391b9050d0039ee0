use crate::bot::{HazardLevel, HistoryCounts, PlacementRule};
use kittens_core::model::card::Card;
use kittens_core::model::seat::SeatId;
use parking_lot::Mutex;
use std::sync::Arc;

/// One decision as seen by an observer.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionRecord {
    Play {
        seat: SeatId,
        hazard_probability: f32,
        chosen: Option<Card>,
        reason: &'static str,
    },
    Placement {
        seat: SeatId,
        cards_remaining: usize,
        position: usize,
        rule: Option<PlacementRule>,
    },
    Peek {
        seat: SeatId,
        top: Vec<Card>,
        reaction: Option<Card>,
        belief: Option<HazardLevel>,
    },
    Beliefs {
        seat: SeatId,
        counts: HistoryCounts,
    },
}

/// Hook for diagnostics. Policies call it after every decision when one is
/// installed; decisions never depend on it.
pub trait DecisionObserver: Send {
    fn observe(&mut self, record: &DecisionRecord);
}

/// Observer that keeps every record in a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    records: Arc<Mutex<Vec<DecisionRecord>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DecisionObserver for RecordingObserver {
    fn observe(&mut self, record: &DecisionRecord) {
        self.records.lock().push(record.clone());
    }
}
