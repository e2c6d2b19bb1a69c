use std::sync::Arc;

use crate::domain::repositories::{GameRepository, SyncError};
use crate::domain::services::{distribution, roll_counts};
use crate::domain::value_objects::Distribution;

/// Get distribution input
pub struct GetDistributionInput {
    pub game_id: String,
    /// Only count rolls of this seat
    pub player_filter: Option<usize>,
}

/// Get distribution output
pub struct GetDistributionOutput {
    pub distribution: Distribution,
    pub roll_counts: Vec<u32>,
}

/// Actual vs expected sums for a game, optionally for one player
pub struct GetDistribution<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> GetDistribution<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: GetDistributionInput,
    ) -> Result<GetDistributionOutput, GetDistributionError> {
        let game = self
            .game_repo
            .find_by_id(&input.game_id)
            .await?
            .ok_or_else(|| GetDistributionError::GameNotFound(input.game_id.clone()))?;

        if let Some(index) = input.player_filter {
            if index >= game.player_count() {
                return Err(GetDistributionError::InvalidPlayer {
                    index,
                    player_count: game.player_count(),
                });
            }
        }

        let rolls = self.game_repo.get_rolls(&game.id).await?;

        Ok(GetDistributionOutput {
            distribution: distribution(&rolls, input.player_filter),
            roll_counts: roll_counts(&rolls, game.player_count()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetDistributionError {
    #[error("Game not found: {0}")]
    GameNotFound(String),
    #[error("Player {index} is not in this game ({player_count} players)")]
    InvalidPlayer { index: usize, player_count: usize },
    #[error("Store error: {0}")]
    Sync(#[from] SyncError),
}
