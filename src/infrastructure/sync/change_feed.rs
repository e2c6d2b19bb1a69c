use async_broadcast::{broadcast, InactiveReceiver, Receiver, RecvError, Sender, TrySendError};

/// Committed change in the store, published after the write is durable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    GameCreated { game_id: String, owner_id: String },
    GameUpdated { game_id: String, owner_id: String },
    RollAppended { game_id: String, owner_id: String },
    PlayerNamesUpdated { user_id: String },
}

impl StoreChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreChange::GameCreated { .. } => "gameCreated",
            StoreChange::GameUpdated { .. } => "gameUpdated",
            StoreChange::RollAppended { .. } => "rollAppended",
            StoreChange::PlayerNamesUpdated { .. } => "playerNamesUpdated",
        }
    }

    pub fn game_id(&self) -> Option<&str> {
        match self {
            StoreChange::GameCreated { game_id, .. }
            | StoreChange::GameUpdated { game_id, .. }
            | StoreChange::RollAppended { game_id, .. } => Some(game_id),
            StoreChange::PlayerNamesUpdated { .. } => None,
        }
    }

    pub fn owner_id(&self) -> Option<&str> {
        match self {
            StoreChange::GameCreated { owner_id, .. }
            | StoreChange::GameUpdated { owner_id, .. }
            | StoreChange::RollAppended { owner_id, .. } => Some(owner_id),
            StoreChange::PlayerNamesUpdated { .. } => None,
        }
    }
}

/// Fan-out of store changes to live subscriptions.
///
/// Overflow drops the oldest change; listeners are told how many they
/// missed and re-read their snapshot.
pub struct ChangeFeed {
    sender: Sender<StoreChange>,
    // keeps the channel open while no subscription is listening
    _idle: InactiveReceiver<StoreChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (mut sender, receiver) = broadcast(capacity.max(1));
        sender.set_overflow(true);
        Self {
            sender,
            _idle: receiver.deactivate(),
        }
    }

    /// Publish a committed change to every listener
    pub fn publish(&self, change: StoreChange) {
        tracing::debug!(
            "Publishing '{}' to {} listeners",
            change.as_str(),
            self.sender.receiver_count()
        );
        match self.sender.try_broadcast(change) {
            Ok(None) => {}
            Ok(Some(dropped)) => {
                tracing::debug!("Change feed full, dropped oldest '{}'", dropped.as_str());
            }
            Err(TrySendError::Inactive(_)) => {
                tracing::trace!("Change published with no active listeners");
            }
            Err(e) => {
                tracing::warn!("Failed to publish change: {:?}", e);
            }
        }
    }

    /// Start listening. Only changes published after this call are seen.
    pub fn listen(&self) -> ChangeListener {
        ChangeListener {
            receiver: self.sender.new_receiver(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// What a listener observed next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Change(StoreChange),
    /// Some changes were dropped before this listener saw them
    Missed(u64),
    Closed,
}

pub struct ChangeListener {
    receiver: Receiver<StoreChange>,
}

impl ChangeListener {
    pub async fn next(&mut self) -> FeedEvent {
        match self.receiver.recv().await {
            Ok(change) => FeedEvent::Change(change),
            Err(RecvError::Overflowed(missed)) => FeedEvent::Missed(missed),
            Err(RecvError::Closed) => FeedEvent::Closed,
        }
    }
}
