use std::sync::Arc;

use crate::domain::entities::{Game, GameStatus};
use crate::domain::errors::{TransitionError, TurnOperation};
use crate::domain::repositories::{GameRepository, SyncError};
use crate::domain::services::end_game;

/// End game input
pub struct EndGameInput {
    pub game_id: String,
}

/// End game output
pub struct EndGameOutput {
    pub game: Game,
}

/// End game use case
pub struct EndGame<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> EndGame<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: EndGameInput) -> Result<EndGameOutput, EndGameError> {
        let mut game = self
            .game_repo
            .find_by_id(&input.game_id)
            .await?
            .ok_or_else(|| EndGameError::GameNotFound(input.game_id.clone()))?;

        end_game(&mut game).inspect_err(|e| {
            tracing::error!("Rejected end of game {}: {}", input.game_id, e);
        })?;

        if !self.game_repo.complete(&game.id).await? {
            // Completed by another writer since it was read
            tracing::error!("Game {} was already completed", game.id);
            return Err(TransitionError::InvalidTransition {
                operation: TurnOperation::EndGame,
                status: Some(GameStatus::Completed),
            }
            .into());
        }

        tracing::info!("Game {} completed", game.id);
        Ok(EndGameOutput { game })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EndGameError {
    #[error("Game not found: {0}")]
    GameNotFound(String),
    #[error("{0}")]
    Transition(#[from] TransitionError),
    #[error("Store error: {0}")]
    Sync(#[from] SyncError),
}
