use std::sync::Arc;

use crate::domain::entities::{Game, Roll};
use crate::domain::errors::{TransitionError, TurnOperation, ValidationError};
use crate::domain::repositories::{GameRepository, SyncError, TurnPrecondition};
use crate::domain::services::play_turn;
use crate::domain::value_objects::Dice;
use crate::infrastructure::services::Randomizer;

/// Record roll input
pub struct RecordRollInput {
    pub game_id: String,
    /// Seat the caller believes is playing; defaults to the stored one
    pub expected_player_index: Option<usize>,
    pub die1: Option<u8>,
    pub die2: Option<u8>,
}

/// Record roll output
pub struct RecordRollOutput {
    pub roll: Roll,
    /// Game after the turn advanced
    pub game: Game,
}

/// Record a roll for the current player and pass the turn, atomically
pub struct RecordRollAndAdvance<G: GameRepository> {
    game_repo: Arc<G>,
    randomizer: Arc<Randomizer>,
}

impl<G: GameRepository> RecordRollAndAdvance<G> {
    pub fn new(game_repo: Arc<G>, randomizer: Arc<Randomizer>) -> Self {
        Self {
            game_repo,
            randomizer,
        }
    }

    pub async fn execute(&self, input: RecordRollInput) -> Result<RecordRollOutput, RecordRollError> {
        // Validate dice before touching the store
        let dice = match (input.die1, input.die2) {
            (Some(die1), Some(die2)) => Dice::new(die1, die2)?,
            (None, None) => self.randomizer.roll_dice(),
            _ => return Err(ValidationError::MissingDie.into()),
        };

        let Some(game) = self.game_repo.find_by_id(&input.game_id).await? else {
            tracing::error!("Rejected roll on missing game {}", input.game_id);
            return Err(TransitionError::InvalidTransition {
                operation: TurnOperation::RecordRoll,
                status: None,
            }
            .into());
        };

        let expected = input.expected_player_index.unwrap_or(game.current_player_index);

        let mut next = game.clone();
        let roll = play_turn(&mut next, dice).inspect_err(|e| {
            tracing::error!("Rejected roll on game {}: {}", game.id, e);
        })?;

        if expected != game.current_player_index {
            tracing::warn!(
                "Stale roll on game {}: expected player {}, current is {}",
                game.id,
                expected,
                game.current_player_index
            );
            return Err(RecordRollError::Conflict {
                expected,
                actual: Some(game.current_player_index),
            });
        }

        let precondition = TurnPrecondition {
            current_player_index: expected,
            next_player_index: next.current_player_index,
        };

        match self
            .game_repo
            .append_roll_and_advance(&game.id, precondition, roll)
            .await?
        {
            Some(roll) => {
                tracing::debug!(
                    "Game {}: player {} rolled {} (#{})",
                    game.id,
                    roll.player_index,
                    roll.sum,
                    roll.sequence
                );
                Ok(RecordRollOutput { roll, game: next })
            }
            None => {
                // Another writer got there first
                let actual = self
                    .game_repo
                    .find_by_id(&game.id)
                    .await?
                    .filter(Game::is_active)
                    .map(|g| g.current_player_index);
                tracing::warn!(
                    "Roll on game {} lost the race: expected player {}, now {:?}",
                    game.id,
                    expected,
                    actual
                );
                Err(RecordRollError::Conflict { expected, actual })
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordRollError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Transition(#[from] TransitionError),
    #[error("Turn conflict: expected player {expected}, game is at {actual:?}")]
    Conflict {
        expected: usize,
        /// Current seat, or None when the game is no longer active
        actual: Option<usize>,
    },
    #[error("Store error: {0}")]
    Sync(#[from] SyncError),
}
