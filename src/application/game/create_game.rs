use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Game, PlayerColor};
use crate::domain::errors::ValidationError;
use crate::domain::repositories::{GameRepository, PlayerNameRepository, SyncError};
use crate::domain::services::{build_roster, distinct_names, MAX_PLAYERS, MIN_PLAYERS};
use crate::infrastructure::services::Randomizer;

/// One roster entry as entered by the user
pub struct RosterEntryInput {
    pub name: String,
    /// Palette token or hex value; defaults to the seat color
    pub color: Option<String>,
}

/// Create game input
pub struct CreateGameInput {
    pub owner_id: String,
    pub players: Vec<RosterEntryInput>,
    pub randomize_start: bool,
}

/// Create game output
pub struct CreateGameOutput {
    pub game: Game,
}

/// Create game use case
pub struct CreateGame<G: GameRepository, N: PlayerNameRepository> {
    game_repo: Arc<G>,
    name_repo: Arc<N>,
    randomizer: Arc<Randomizer>,
}

impl<G: GameRepository, N: PlayerNameRepository> CreateGame<G, N> {
    pub fn new(game_repo: Arc<G>, name_repo: Arc<N>, randomizer: Arc<Randomizer>) -> Self {
        Self {
            game_repo,
            name_repo,
            randomizer,
        }
    }

    pub async fn execute(&self, input: CreateGameInput) -> Result<CreateGameOutput, CreateGameError> {
        let count = input.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ValidationError::RosterSize {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: count,
            }
            .into());
        }

        let colors = input
            .players
            .iter()
            .enumerate()
            .map(|(seat, entry)| match entry.color.as_deref() {
                Some(raw) => PlayerColor::from_str(raw)
                    .ok_or_else(|| ValidationError::UnknownColor(raw.to_string())),
                None => PlayerColor::for_seat(seat)
                    .ok_or_else(|| ValidationError::UnknownColor(format!("seat {}", seat))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let names: Vec<&str> = input.players.iter().map(|p| p.name.as_str()).collect();

        let mut roster = build_roster(&names, &colors)?;
        if input.randomize_start {
            roster = self.randomizer.rotate_start(roster);
        }

        let game = Game::new(Uuid::new_v4().to_string(), input.owner_id.clone(), roster);
        self.game_repo.create(&game).await?;

        tracing::info!(
            "Game {} created by {} with {} players",
            game.id,
            game.owner_id,
            game.player_count()
        );

        // Remembered names only pre-fill the roster form; the game stands without them
        let remembered = distinct_names(game.players.iter().map(|p| p.name.as_str()));
        if let Err(e) = self.name_repo.record_usage(&input.owner_id, &remembered).await {
            tracing::warn!("Failed to remember player names for {}: {}", input.owner_id, e);
        }

        Ok(CreateGameOutput { game })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateGameError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Store error: {0}")]
    Sync(#[from] SyncError),
}
