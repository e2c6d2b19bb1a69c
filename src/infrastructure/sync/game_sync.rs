use std::sync::Arc;

use crate::domain::entities::{Game, RememberedPlayerName, Roll};
use crate::domain::repositories::{GameRepository, PlayerNameRepository, REMEMBERED_NAMES_LIMIT};
use crate::infrastructure::services::{SubscriptionTopic, SubscriptionTracker};
use crate::infrastructure::sync::{spawn_subscription, ChangeFeed, GameView, StoreChange, Subscription};

/// Live views over the store.
///
/// Each subscription delivers an initial snapshot and then a new full
/// snapshot after every relevant committed change. The game document and
/// its roll ledger are separate subscriptions with no ordering between
/// them.
pub struct GameSync<G: GameRepository + 'static, N: PlayerNameRepository + 'static> {
    game_repo: Arc<G>,
    name_repo: Arc<N>,
    feed: Arc<ChangeFeed>,
    tracker: Arc<SubscriptionTracker>,
}

impl<G: GameRepository + 'static, N: PlayerNameRepository + 'static> GameSync<G, N> {
    pub fn new(
        game_repo: Arc<G>,
        name_repo: Arc<N>,
        feed: Arc<ChangeFeed>,
        tracker: Arc<SubscriptionTracker>,
    ) -> Self {
        Self {
            game_repo,
            name_repo,
            feed,
            tracker,
        }
    }

    /// Live game document. Ends with `NotFound` if the game does not exist.
    pub fn subscribe_game(&self, game_id: &str) -> Subscription<Game> {
        let repo = self.game_repo.clone();
        let id = game_id.to_string();
        let watched = game_id.to_string();

        spawn_subscription(
            &self.feed,
            &self.tracker,
            SubscriptionTopic::Game(game_id.to_string()),
            move |change| {
                matches!(change, StoreChange::GameUpdated { .. } | StoreChange::RollAppended { .. })
                    && change.game_id() == Some(watched.as_str())
            },
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.find_by_id(&id).await }
            },
        )
    }

    /// Live roll ledger of a game, ascending by ordering key
    pub fn subscribe_rolls(&self, game_id: &str) -> Subscription<Vec<Roll>> {
        let repo = self.game_repo.clone();
        let id = game_id.to_string();
        let watched = game_id.to_string();

        spawn_subscription(
            &self.feed,
            &self.tracker,
            SubscriptionTopic::Rolls(game_id.to_string()),
            move |change| {
                matches!(change, StoreChange::RollAppended { .. })
                    && change.game_id() == Some(watched.as_str())
            },
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.get_rolls(&id).await.map(Some) }
            },
        )
    }

    /// Live list of an owner's games, newest first
    pub fn subscribe_games(&self, owner_id: &str) -> Subscription<Vec<Game>> {
        let repo = self.game_repo.clone();
        let owner = owner_id.to_string();
        let watched = owner_id.to_string();

        spawn_subscription(
            &self.feed,
            &self.tracker,
            SubscriptionTopic::Games(owner_id.to_string()),
            move |change| change.owner_id() == Some(watched.as_str()),
            move || {
                let repo = repo.clone();
                let owner = owner.clone();
                async move { repo.find_by_owner(&owner).await.map(Some) }
            },
        )
    }

    /// Live remembered names of a user, most used first
    pub fn subscribe_player_names(&self, user_id: &str) -> Subscription<Vec<RememberedPlayerName>> {
        let repo = self.name_repo.clone();
        let user = user_id.to_string();
        let watched = user_id.to_string();

        spawn_subscription(
            &self.feed,
            &self.tracker,
            SubscriptionTopic::PlayerNames(user_id.to_string()),
            move |change| {
                matches!(change, StoreChange::PlayerNamesUpdated { user_id } if *user_id == watched)
            },
            move || {
                let repo = repo.clone();
                let user = user.clone();
                async move { repo.find_top(&user, REMEMBERED_NAMES_LIMIT).await.map(Some) }
            },
        )
    }

    /// Open both subscriptions needed to show one game.
    /// Dropping or closing the view releases them.
    pub fn open_game_view(&self, game_id: &str) -> GameView {
        GameView::new(
            game_id.to_string(),
            self.subscribe_game(game_id),
            self.subscribe_rolls(game_id),
        )
    }
}
