use async_trait::async_trait;

use crate::domain::entities::UserProfile;

/// Failure of a read, write or subscription against the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(String),
}

/// User profile repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, SyncError>;

    /// Upsert the profile and stamp the login time.
    /// The stored `blocked` flag is never overwritten.
    async fn record_sign_in(&self, profile: &UserProfile) -> Result<UserProfile, SyncError>;
}
