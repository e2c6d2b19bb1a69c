use serde::{Deserialize, Serialize};

/// Profile of an authenticated user, as mirrored from the identity provider.
/// `blocked` is set by operators outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub last_login: Option<i64>,
    #[serde(rename = "blockedUser")]
    pub blocked: bool,
}

impl UserProfile {
    /// Fallback used when the provider supplies no display name
    pub const ANONYMOUS: &'static str = "Anonymous";

    pub fn new(id: String, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name: display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| Self::ANONYMOUS.to_string()),
            last_login: None,
            blocked: false,
        }
    }
}

/// Remembered roster entry, keyed per user by normalized name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberedPlayerName {
    pub normalized_name: String,
    pub display_name: String,
    pub usage_count: u32,
    pub last_used_at: i64,
}
