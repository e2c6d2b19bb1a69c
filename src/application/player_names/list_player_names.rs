use std::sync::Arc;

use crate::domain::entities::RememberedPlayerName;
use crate::domain::repositories::{PlayerNameRepository, SyncError, REMEMBERED_NAMES_LIMIT};

/// Names a user has entered before, most used first
pub struct ListPlayerNames<N: PlayerNameRepository> {
    name_repo: Arc<N>,
}

impl<N: PlayerNameRepository> ListPlayerNames<N> {
    pub fn new(name_repo: Arc<N>) -> Self {
        Self { name_repo }
    }

    pub async fn execute(&self, user_id: &str) -> Result<Vec<RememberedPlayerName>, SyncError> {
        self.name_repo.find_top(user_id, REMEMBERED_NAMES_LIMIT).await
    }
}
