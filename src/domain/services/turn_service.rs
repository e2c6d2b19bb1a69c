//! Turn state machine.
//!
//! A game is `Active` from creation until `end_game`, after which it is
//! `Completed` for good. While active, every recorded roll is paired with
//! exactly one turn advance; `play_turn` is that pair as one operation.

use crate::domain::entities::{Game, GameStatus, NewRoll};
use crate::domain::errors::{TransitionError, TurnOperation};
use crate::domain::value_objects::Dice;

fn ensure_active(game: &Game, operation: TurnOperation) -> Result<(), TransitionError> {
    match game.status {
        GameStatus::Active => Ok(()),
        status => Err(TransitionError::InvalidTransition {
            operation,
            status: Some(status),
        }),
    }
}

/// Seat that plays after `index` in a game of `player_count` seats
pub fn next_player_index(index: usize, player_count: usize) -> usize {
    (index + 1) % player_count
}

/// Accept a roll for `player_index`. Does not change the game.
pub fn record_roll(game: &Game, player_index: usize, dice: Dice) -> Result<NewRoll, TransitionError> {
    ensure_active(game, TurnOperation::RecordRoll)?;

    if player_index >= game.player_count() {
        return Err(TransitionError::PlayerIndexOutOfRange {
            index: player_index,
            player_count: game.player_count(),
        });
    }

    Ok(NewRoll { player_index, dice })
}

/// Pass the turn to the next seat, wrapping around. Returns the new index.
pub fn advance_turn(game: &mut Game) -> Result<usize, TransitionError> {
    ensure_active(game, TurnOperation::AdvanceTurn)?;

    if game.players.is_empty() {
        return Err(TransitionError::PlayerIndexOutOfRange {
            index: game.current_player_index,
            player_count: 0,
        });
    }

    game.current_player_index = next_player_index(game.current_player_index, game.player_count());
    Ok(game.current_player_index)
}

/// Complete the game. Terminal: a completed game rejects every transition.
pub fn end_game(game: &mut Game) -> Result<(), TransitionError> {
    ensure_active(game, TurnOperation::EndGame)?;
    game.status = GameStatus::Completed;
    Ok(())
}

/// Record a roll for the current player and advance the turn.
///
/// Either both happen or neither does.
pub fn play_turn(game: &mut Game, dice: Dice) -> Result<NewRoll, TransitionError> {
    let roll = record_roll(game, game.current_player_index, dice)?;
    advance_turn(game)?;
    Ok(roll)
}
