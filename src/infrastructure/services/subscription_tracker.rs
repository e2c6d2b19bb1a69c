use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// What a live subscription is watching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionTopic {
    Game(String),
    Rolls(String),
    Games(String),
    PlayerNames(String),
}

impl SubscriptionTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTopic::Game(_) => "game",
            SubscriptionTopic::Rolls(_) => "rolls",
            SubscriptionTopic::Games(_) => "games",
            SubscriptionTopic::PlayerNames(_) => "playerNames",
        }
    }

    /// Game ID, owner ID or user ID, depending on the topic
    pub fn key(&self) -> &str {
        match self {
            SubscriptionTopic::Game(id)
            | SubscriptionTopic::Rolls(id)
            | SubscriptionTopic::Games(id)
            | SubscriptionTopic::PlayerNames(id) => id,
        }
    }

    pub fn game_id(&self) -> Option<&str> {
        match self {
            SubscriptionTopic::Game(id) | SubscriptionTopic::Rolls(id) => Some(id),
            _ => None,
        }
    }
}

/// Open subscription record
#[derive(Debug, Clone)]
pub struct SubscriptionInfo {
    pub id: u64,
    pub topic: SubscriptionTopic,
    pub opened_at: i64,
}

/// Registry of open subscriptions.
///
/// Entries live exactly as long as their `SubscriptionGuard`, so the
/// registry is empty once every view has released its subscriptions.
pub struct SubscriptionTracker {
    active: RwLock<HashMap<u64, SubscriptionInfo>>,
    next_id: AtomicU64,
}

impl SubscriptionTracker {
    pub fn new() -> Self {
        Self {
            active: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<u64, SubscriptionInfo>> {
        self.active.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<u64, SubscriptionInfo>> {
        self.active.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a new subscription; it is released when the guard drops
    pub fn register(self: &Arc<Self>, topic: SubscriptionTopic) -> SubscriptionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let info = SubscriptionInfo {
            id,
            topic,
            opened_at: chrono::Utc::now().timestamp_millis(),
        };

        tracing::debug!("Subscription {} opened on {} {}", id, info.topic.as_str(), info.topic.key());
        self.write().insert(id, info);

        SubscriptionGuard {
            tracker: Arc::clone(self),
            id,
        }
    }

    fn release(&self, id: u64) {
        if let Some(info) = self.write().remove(&id) {
            tracing::debug!(
                "Subscription {} closed on {} {} after {}ms",
                id,
                info.topic.as_str(),
                info.topic.key(),
                chrono::Utc::now().timestamp_millis() - info.opened_at
            );
        }
    }

    /// Count open subscriptions
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Count open subscriptions watching one game or its ledger
    pub fn count_for_game(&self, game_id: &str) -> usize {
        self.read()
            .values()
            .filter(|info| info.topic.game_id() == Some(game_id))
            .count()
    }
}

impl Default for SubscriptionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a registry entry alive
pub struct SubscriptionGuard {
    tracker: Arc<SubscriptionTracker>,
    id: u64,
}

impl SubscriptionGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.tracker.release(self.id);
    }
}
