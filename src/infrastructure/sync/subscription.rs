//! Cancellable live snapshot streams.
//!
//! Every item a `Subscription` yields is a complete, authoritative snapshot
//! that replaces the previous one. Items arrive in the order the store
//! committed the changes behind them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::repositories::SyncError;
use crate::infrastructure::services::{SubscriptionGuard, SubscriptionTopic, SubscriptionTracker};
use crate::infrastructure::sync::{ChangeFeed, FeedEvent, StoreChange};

/// Snapshots buffered between the store task and a slow consumer
const SNAPSHOT_BUFFER: usize = 16;

/// Live sequence of full snapshots.
///
/// `unsubscribe` (or dropping the subscription) stops delivery at once:
/// nothing is yielded afterwards, even snapshots already buffered.
pub struct Subscription<T> {
    receiver: mpsc::Receiver<Result<T, SyncError>>,
    task: JoinHandle<()>,
    registration: Option<SubscriptionGuard>,
    closed: bool,
}

impl<T> Subscription<T> {
    /// Stop delivery and release the store listener. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.task.abort();
        self.receiver.close();
        self.registration.take();
    }

    pub fn is_active(&self) -> bool {
        !self.closed
    }
}

impl<T> Unpin for Subscription<T> {}

impl<T> Stream for Subscription<T> {
    type Item = Result<T, SyncError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.closed {
            return Poll::Ready(None);
        }
        self.receiver.poll_recv(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Start a subscription that re-reads its snapshot whenever a relevant
/// change is committed.
///
/// The listener is attached before the first read, so no change between
/// the initial snapshot and the first update is lost. Consecutive
/// identical snapshots are delivered once. A missing document ends the
/// subscription with `NotFound`; a store failure ends it with that error.
pub fn spawn_subscription<T, R, F, Fut>(
    feed: &ChangeFeed,
    tracker: &Arc<SubscriptionTracker>,
    topic: SubscriptionTopic,
    is_relevant: R,
    fetch: F,
) -> Subscription<T>
where
    T: Clone + PartialEq + Send + 'static,
    R: Fn(&StoreChange) -> bool + Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<T>, SyncError>> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
    let mut listener = feed.listen();
    let registration = tracker.register(topic.clone());

    let task = tokio::spawn(async move {
        let mut last: Option<T> = None;

        loop {
            match fetch().await {
                Ok(Some(snapshot)) => {
                    if last.as_ref() != Some(&snapshot) {
                        if sender.send(Ok(snapshot.clone())).await.is_err() {
                            break;
                        }
                        last = Some(snapshot);
                    }
                }
                Ok(None) => {
                    let what = format!("{} {}", topic.as_str(), topic.key());
                    let _ = sender.send(Err(SyncError::NotFound(what))).await;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Subscription on {} {} failed: {}", topic.as_str(), topic.key(), e);
                    let _ = sender.send(Err(e)).await;
                    break;
                }
            }

            loop {
                match listener.next().await {
                    FeedEvent::Change(change) if is_relevant(&change) => break,
                    FeedEvent::Change(_) => continue,
                    FeedEvent::Missed(count) => {
                        tracing::debug!("Subscription missed {} changes, re-reading", count);
                        break;
                    }
                    FeedEvent::Closed => return,
                }
            }
        }
    });

    Subscription {
        receiver,
        task,
        registration: Some(registration),
        closed: false,
    }
}
