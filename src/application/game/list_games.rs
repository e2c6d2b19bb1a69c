use std::sync::Arc;

use crate::domain::entities::Game;
use crate::domain::repositories::{GameRepository, SyncError};

/// List games input
pub struct ListGamesInput {
    pub owner_id: String,
}

/// Game with its ledger size
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub game: Game,
    pub roll_count: u32,
}

/// List games output
pub struct ListGamesOutput {
    /// Newest first
    pub games: Vec<GameSummary>,
}

/// List games use case
pub struct ListGames<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> ListGames<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: ListGamesInput) -> Result<ListGamesOutput, SyncError> {
        let games = self.game_repo.find_by_owner(&input.owner_id).await?;
        let counts = self.game_repo.count_rolls_by_owner(&input.owner_id).await?;

        Ok(ListGamesOutput {
            games: summarize(games, |id| counts.get(id).copied().unwrap_or(0)),
        })
    }
}

/// Pair each game with its roll count, keeping order
pub fn summarize(games: Vec<Game>, roll_count: impl Fn(&str) -> u32) -> Vec<GameSummary> {
    games
        .into_iter()
        .map(|game| GameSummary {
            roll_count: roll_count(&game.id),
            game,
        })
        .collect()
}
