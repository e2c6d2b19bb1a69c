use std::sync::Arc;

use sqlx::SqlitePool;

use crate::infrastructure::auth::IdentityVerifier;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::repositories::{
    SqliteGameRepository, SqlitePlayerNameRepository, SqliteUserRepository,
};
use crate::infrastructure::database::{connect, initialize_schema};
use crate::infrastructure::services::{Randomizer, SubscriptionTracker};
use crate::infrastructure::sync::{ChangeFeed, GameSync};

pub type StoreSync = GameSync<SqliteGameRepository, SqlitePlayerNameRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    pub config: Arc<AppConfig>,

    /// Identity token verification
    pub identity: Arc<IdentityVerifier>,

    pub user_repo: Arc<SqliteUserRepository>,
    pub game_repo: Arc<SqliteGameRepository>,
    pub player_name_repo: Arc<SqlitePlayerNameRepository>,

    /// Committed store changes, fanned out to live subscriptions
    pub feed: Arc<ChangeFeed>,

    /// Open live subscriptions
    pub tracker: Arc<SubscriptionTracker>,

    pub game_sync: Arc<StoreSync>,

    pub randomizer: Arc<Randomizer>,

    pub started_at: i64,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env()).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let db = connect(&config.database_url).await?;
        initialize_schema(&db).await?;

        let identity = Arc::new(IdentityVerifier::new(&config.identity_secret));
        let feed = Arc::new(ChangeFeed::new(config.change_feed_capacity));
        let tracker = Arc::new(SubscriptionTracker::new());

        // Create repositories
        let user_repo = Arc::new(SqliteUserRepository::new(db.clone()));
        let game_repo = Arc::new(SqliteGameRepository::new(db.clone(), feed.clone()));
        let player_name_repo = Arc::new(SqlitePlayerNameRepository::new(db.clone(), feed.clone()));

        let game_sync = Arc::new(GameSync::new(
            game_repo.clone(),
            player_name_repo.clone(),
            feed.clone(),
            tracker.clone(),
        ));

        let randomizer = Arc::new(Randomizer::new(config.rng_seed));

        Ok(Self {
            db,
            config: Arc::new(config),
            identity,
            user_repo,
            game_repo,
            player_name_repo,
            feed,
            tracker,
            game_sync,
            randomizer,
            started_at: chrono::Utc::now().timestamp(),
        })
    }
}
