//! Persistence boundary for bookmark collections.
//!
//! A [`RemoteStore`] holds every owner's bookmarks and pushes a change
//! notification after each committed write. [`crate::sync::Reconciler`] is the
//! only intended caller; it never assumes anything about ordering or delivery
//! count of notifications beyond "at least once".

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::models::{Bookmark, NewBookmark, Owner};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Owner-scoped bookmark storage with a change feed
///
/// Every operation is restricted to `owner`'s rows. Failures of any kind are
/// reported as [`crate::error::TagmarksError::Remote`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Full collection, newest first
    async fn list(&self, owner: &Owner) -> Result<Vec<Bookmark>>;

    /// Persist a new bookmark; the store assigns id and creation time
    async fn insert(&self, owner: &Owner, bookmark: NewBookmark) -> Result<Bookmark>;

    /// Replace the editable fields of an existing bookmark
    async fn update(&self, owner: &Owner, id: &str, bookmark: NewBookmark) -> Result<Bookmark>;

    /// Delete by id; rejected when the row does not belong to `owner`
    async fn delete(&self, owner: &Owner, id: &str) -> Result<()>;

    /// Open a change feed for `owner`. Dropping the feed unsubscribes.
    async fn subscribe(&self, owner: &Owner) -> Result<ChangeFeed>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification that one of an owner's rows changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub owner: Owner,
    pub id: String,
}

/// What a [`ChangeFeed`] yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSignal {
    Change(ChangeEvent),
    /// The feed fell behind and dropped this many events
    Lagged(u64),
}

/// Subscription to one owner's change events
///
/// Wraps a broadcast receiver shared by all owners and hides events that
/// belong to someone else.
#[derive(Debug)]
pub struct ChangeFeed {
    owner: Owner,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(owner: Owner, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { owner, receiver }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Wait for the next signal; `None` once the store side is gone
    pub async fn recv(&mut self) -> Option<FeedSignal> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.owner == self.owner => return Some(FeedSignal::Change(event)),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => return Some(FeedSignal::Lagged(missed)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next signal that is already queued, without waiting
    pub fn try_recv(&mut self) -> Option<FeedSignal> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.owner == self.owner => return Some(FeedSignal::Change(event)),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => return Some(FeedSignal::Lagged(missed)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
