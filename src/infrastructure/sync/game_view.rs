use futures::StreamExt;

use crate::domain::entities::{Game, Roll};
use crate::domain::repositories::SyncError;
use crate::domain::services::{distribution, roll_counts};
use crate::domain::value_objects::Distribution;
use crate::infrastructure::sync::Subscription;

/// Latest snapshots seen by a view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameViewState {
    pub game: Option<Game>,
    pub rolls: Vec<Roll>,
}

/// One applied snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameViewUpdate {
    Game(Game),
    Rolls(Vec<Roll>),
}

enum Arrival {
    Game(Option<Result<Game, SyncError>>),
    Rolls(Option<Result<Vec<Roll>, SyncError>>),
}

/// Scoped pair of subscriptions for one viewed game.
///
/// Acquired when the game is opened and released by `close` or drop.
/// Game and roll snapshots may arrive in either order; each replaces the
/// previous value of its half of the state.
pub struct GameView {
    game_id: String,
    game: Subscription<Game>,
    rolls: Subscription<Vec<Roll>>,
    state: GameViewState,
    game_done: bool,
    rolls_done: bool,
}

impl GameView {
    pub fn new(game_id: String, game: Subscription<Game>, rolls: Subscription<Vec<Roll>>) -> Self {
        Self {
            game_id,
            game,
            rolls,
            state: GameViewState::default(),
            game_done: false,
            rolls_done: false,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn state(&self) -> &GameViewState {
        &self.state
    }

    /// Wait for the next snapshot from either subscription and apply it.
    ///
    /// Errors are passed through without touching the state. A missing
    /// game closes the view. Returns `None` once the view is closed or both
    /// subscriptions have ended.
    pub async fn next_update(&mut self) -> Option<Result<GameViewUpdate, SyncError>> {
        loop {
            if self.game_done && self.rolls_done {
                return None;
            }

            let arrival = tokio::select! {
                item = self.game.next(), if !self.game_done => Arrival::Game(item),
                item = self.rolls.next(), if !self.rolls_done => Arrival::Rolls(item),
            };

            match arrival {
                Arrival::Game(Some(Ok(game))) => {
                    self.state.game = Some(game.clone());
                    return Some(Ok(GameViewUpdate::Game(game)));
                }
                Arrival::Rolls(Some(Ok(rolls))) => {
                    self.state.rolls = rolls.clone();
                    return Some(Ok(GameViewUpdate::Rolls(rolls)));
                }
                Arrival::Game(Some(Err(e @ SyncError::NotFound(_)))) => {
                    self.close();
                    return Some(Err(e));
                }
                Arrival::Game(Some(Err(e))) | Arrival::Rolls(Some(Err(e))) => return Some(Err(e)),
                Arrival::Game(None) => self.game_done = true,
                Arrival::Rolls(None) => self.rolls_done = true,
            }
        }
    }

    /// Distribution of the latest roll snapshot
    pub fn distribution(&self, player_filter: Option<usize>) -> Distribution {
        distribution(&self.state.rolls, player_filter)
    }

    /// Rolls per seat in the latest snapshots
    pub fn roll_counts(&self) -> Vec<u32> {
        let seats = self.state.game.as_ref().map_or(0, Game::player_count);
        roll_counts(&self.state.rolls, seats)
    }

    /// Release both subscriptions. Nothing is delivered afterwards.
    pub fn close(&mut self) {
        self.game.unsubscribe();
        self.rolls.unsubscribe();
        self.game_done = true;
        self.rolls_done = true;
    }

    pub fn is_open(&self) -> bool {
        self.game.is_active() || self.rolls.is_active()
    }
}
