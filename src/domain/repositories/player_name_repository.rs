use async_trait::async_trait;

use crate::domain::entities::RememberedPlayerName;
use crate::domain::repositories::SyncError;

/// How many remembered names the roster suggests
pub const REMEMBERED_NAMES_LIMIT: u32 = 8;

/// Remembered player names repository trait
#[async_trait]
pub trait PlayerNameRepository: Send + Sync {
    /// Bump usage for each `(normalized, display)` name
    async fn record_usage(&self, user_id: &str, names: &[(String, String)]) -> Result<(), SyncError>;

    /// Most used names first, most recent breaking ties
    async fn find_top(&self, user_id: &str, limit: u32) -> Result<Vec<RememberedPlayerName>, SyncError>;
}
