use std::sync::Arc;

use crate::domain::entities::UserProfile;
use crate::domain::repositories::{SyncError, UserRepository};

/// Start session input, from verified identity claims
pub struct StartSessionInput {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Start session output
pub struct StartSessionOutput {
    pub profile: UserProfile,
}

/// Record a sign-in and return the stored profile, blocked flag included
pub struct StartSession<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> StartSession<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: StartSessionInput) -> Result<StartSessionOutput, SyncError> {
        let profile = UserProfile::new(input.user_id, input.email, input.display_name);
        let profile = self.user_repo.record_sign_in(&profile).await?;

        if profile.blocked {
            tracing::warn!("Blocked user {} signed in", profile.id);
        } else {
            tracing::info!("User {} signed in", profile.id);
        }

        Ok(StartSessionOutput { profile })
    }
}
