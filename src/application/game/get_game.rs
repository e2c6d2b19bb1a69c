use std::sync::Arc;

use crate::domain::entities::{Game, Roll};
use crate::domain::repositories::{GameRepository, SyncError};
use crate::domain::services::roll_counts;

/// Get game input
pub struct GetGameInput {
    pub game_id: String,
}

/// Get game output
pub struct GetGameOutput {
    pub game: Game,
    /// Ledger, ascending by ordering key
    pub rolls: Vec<Roll>,
    /// Rolls per seat
    pub roll_counts: Vec<u32>,
}

/// Get game use case
pub struct GetGame<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> GetGame<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: GetGameInput) -> Result<GetGameOutput, GetGameError> {
        let game = self
            .game_repo
            .find_by_id(&input.game_id)
            .await?
            .ok_or_else(|| GetGameError::GameNotFound(input.game_id.clone()))?;

        let rolls = self.game_repo.get_rolls(&game.id).await?;
        let roll_counts = roll_counts(&rolls, game.player_count());

        Ok(GetGameOutput {
            game,
            rolls,
            roll_counts,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetGameError {
    #[error("Game not found: {0}")]
    GameNotFound(String),
    #[error("Store error: {0}")]
    Sync(#[from] SyncError),
}
