use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::{Game, NewRoll, Roll};
use crate::domain::repositories::SyncError;

/// Turn state a conditional write expects to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPrecondition {
    pub current_player_index: usize,
    pub next_player_index: usize,
}

/// Game and roll ledger repository trait
#[async_trait]
pub trait GameRepository: Send + Sync {
    // ========== Game operations ==========

    /// Find game by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Game>, SyncError>;

    /// Games owned by a user, newest first
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Game>, SyncError>;

    /// Persist a new game with its full roster
    async fn create(&self, game: &Game) -> Result<(), SyncError>;

    /// Mark an active game completed.
    /// Returns false when the game is missing or already completed.
    async fn complete(&self, id: &str) -> Result<bool, SyncError>;

    // ========== Roll ledger ==========

    /// Rolls of a game, ascending by ordering key
    async fn get_rolls(&self, game_id: &str) -> Result<Vec<Roll>, SyncError>;

    /// Roll totals for every game of an owner, keyed by game ID
    async fn count_rolls_by_owner(&self, owner_id: &str) -> Result<HashMap<String, u32>, SyncError>;

    /// Append a roll and advance the turn as one transaction.
    ///
    /// Applies only while the game is active and its current player is
    /// `precondition.current_player_index`; returns `None` otherwise and
    /// writes nothing.
    async fn append_roll_and_advance(
        &self,
        game_id: &str,
        precondition: TurnPrecondition,
        roll: NewRoll,
    ) -> Result<Option<Roll>, SyncError>;
}
