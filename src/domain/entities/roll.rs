use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Dice;

/// Roll entity - one immutable entry of a game's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roll {
    pub id: String,
    pub game_id: String,
    pub player_index: usize,
    pub die1: u8,
    pub die2: u8,
    pub sum: u8,
    /// Ordering key, strictly increasing within one game
    pub sequence: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A roll accepted by the turn state machine but not yet persisted.
/// The store assigns `id`, `sequence` and `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRoll {
    pub player_index: usize,
    pub dice: Dice,
}

impl NewRoll {
    pub fn into_roll(self, id: String, game_id: String, sequence: u64, timestamp: i64) -> Roll {
        Roll {
            id,
            game_id,
            player_index: self.player_index,
            die1: self.dice.die1,
            die2: self.dice.die2,
            sum: self.dice.sum(),
            sequence,
            timestamp,
        }
    }
}
