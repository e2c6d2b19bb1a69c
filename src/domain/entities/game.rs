use serde::{Deserialize, Serialize};

use crate::domain::entities::Player;

/// Game lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Completed,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GameStatus::Active),
            "completed" => Some(GameStatus::Completed),
            _ => None,
        }
    }
}

/// Game entity
///
/// Created atomically with its full roster. Only `current_player_index` and
/// `status` change afterwards, and only through the turn state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub status: GameStatus,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    #[serde(rename = "userId")]
    pub owner_id: String,
}

impl Game {
    /// Create a new active game with the first seat to play
    pub fn new(id: String, owner_id: String, players: Vec<Player>) -> Self {
        Self {
            id,
            players,
            current_player_index: 0,
            status: GameStatus::Active,
            created_at: chrono::Utc::now().timestamp_millis(),
            owner_id,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
