use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/dice_tracker.db";
pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_CHANGE_FEED_CAPACITY: usize = 1024;
const DEV_IDENTITY_SECRET: &str = "dice-tracker-secret-change-in-production";

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub identity_secret: String,
    pub change_feed_capacity: usize,
    /// Fixed seed for server-side dice and start-order rotation
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_PATH"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let identity_secret = std::env::var("IDENTITY_SECRET").unwrap_or_else(|_| {
            tracing::warn!("IDENTITY_SECRET not set, using the development secret");
            DEV_IDENTITY_SECRET.to_string()
        });

        Self {
            database_url,
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            identity_secret,
            change_feed_capacity: parse_var("CHANGE_FEED_CAPACITY")
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CHANGE_FEED_CAPACITY),
            rng_seed: parse_var("DICE_SEED"),
        }
    }

    /// In-memory configuration for tests
    pub fn in_memory(identity_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: DEFAULT_PORT,
            identity_secret: identity_secret.to_string(),
            change_feed_capacity: DEFAULT_CHANGE_FEED_CAPACITY,
            rng_seed: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}='{}'", name, raw);
            None
        }
    }
}
