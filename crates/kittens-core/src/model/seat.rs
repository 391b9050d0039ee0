use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(u8);

impl SeatId {
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < MAX_PLAYERS {
            Some(SeatId(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seat to the left in a table of `players` seats.
    pub const fn next(self, players: usize) -> SeatId {
        if players == 0 {
            return self;
        }
        SeatId(((self.0 as usize + 1) % players) as u8)
    }

    pub fn all(players: usize) -> impl Iterator<Item = SeatId> {
        (0..players.min(MAX_PLAYERS)).map(|index| SeatId(index as u8))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat-{}", self.0)
    }
}
