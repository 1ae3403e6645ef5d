//! Keeps a local snapshot of the signed-in owner's collection in step with the
//! store.
//!
//! Local writes go straight to the store and are never applied to the snapshot
//! directly. Every change notification (including the ones our own writes
//! cause) triggers a wholesale refetch, so the snapshot always converges on
//! whatever the store last reported.

use crate::error::{Result, TagmarksError};
use crate::exchange;
use crate::filter;
use crate::models::{Bookmark, NewBookmark, Owner};
use crate::store::{ChangeFeed, FeedSignal, RemoteStore};
use crate::tags::{self, TagSelection};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Immutable view of the collection, newest first
pub type Snapshot = Arc<Vec<Bookmark>>;

/// Outcome of importing an exchange file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Already in the collection (or repeated within the file)
    pub duplicates: usize,
    /// Rejected by validation, e.g. a relative URL
    pub invalid: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} bookmarks ({} duplicates skipped, {} invalid)",
            self.imported, self.duplicates, self.invalid
        )
    }
}

/// The live subscription of one signed-in owner
///
/// Owns the listener task, which in turn owns the change feed. Dropping the
/// session aborts the task, and the feed goes with it.
pub struct SyncSession {
    owner: Owner,
    listener: JoinHandle<()>,
}

impl SyncSession {
    pub fn owner(&self) -> &Owner {
        &self.owner
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

struct Applied {
    owner: Option<Owner>,
    ticket: u64,
}

/// State shared between the reconciler and its listener task
struct SyncState {
    next_ticket: AtomicU64,
    applied: Mutex<Applied>,
    snapshot: watch::Sender<Snapshot>,
}

impl SyncState {
    fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            next_ticket: AtomicU64::new(0),
            applied: Mutex::new(Applied {
                owner: None,
                ticket: 0,
            }),
            snapshot,
        }
    }

    fn applied(&self) -> MutexGuard<'_, Applied> {
        self.applied.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install `owner` as the current owner with an empty snapshot.
    /// Fetches started before this call can no longer be applied.
    fn reset(&self, owner: Option<Owner>) {
        let mut applied = self.applied();
        applied.owner = owner;
        applied.ticket = self.next_ticket.load(Ordering::SeqCst);
        self.snapshot.send_replace(Arc::new(Vec::new()));
    }

    /// Apply a fetch result unless a newer one already landed or the owner
    /// changed while it was in flight
    fn publish(&self, ticket: u64, owner: &Owner, bookmarks: Vec<Bookmark>) -> bool {
        let mut applied = self.applied();
        if applied.owner.as_ref() != Some(owner) {
            debug!("Dropping fetch #{} for {}: owner changed", ticket, owner);
            return false;
        }
        if ticket <= applied.ticket {
            debug!("Dropping stale fetch #{} (applied #{})", ticket, applied.ticket);
            return false;
        }
        applied.ticket = ticket;
        self.snapshot.send_replace(Arc::new(bookmarks));
        true
    }
}

async fn refetch<S: RemoteStore + ?Sized>(store: &S, state: &SyncState, owner: &Owner) -> Result<()> {
    let ticket = state.take_ticket();
    let bookmarks = store.list(owner).await?;
    debug!("Fetch #{} returned {} bookmarks for {}", ticket, bookmarks.len(), owner);
    state.publish(ticket, owner, bookmarks);
    Ok(())
}

async fn listen<S: RemoteStore + ?Sized>(
    store: Arc<S>,
    state: Arc<SyncState>,
    owner: Owner,
    mut feed: ChangeFeed,
) {
    while let Some(signal) = feed.recv().await {
        let mut burst = 1usize;
        if let FeedSignal::Lagged(missed) = signal {
            debug!("Change feed for {} lagged by {} events", owner, missed);
        }
        while feed.try_recv().is_some() {
            burst += 1;
        }

        debug!("Refetching after {} change signal(s) for {}", burst, owner);
        if let Err(e) = refetch(store.as_ref(), &state, &owner).await {
            warn!("Refetch for {} failed: {}", owner, e);
        }
    }
    debug!("Change feed for {} closed", owner);
}

/// Maintains the snapshot of the signed-in owner's collection
pub struct Reconciler<S: RemoteStore + 'static> {
    store: Arc<S>,
    state: Arc<SyncState>,
    session: Option<SyncSession>,
}

impl<S: RemoteStore + 'static> Reconciler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: Arc::new(SyncState::new()),
            session: None,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Currently signed-in owner
    pub fn owner(&self) -> Option<&Owner> {
        self.session.as_ref().map(SyncSession::owner)
    }

    fn require_owner(&self) -> Result<Owner> {
        self.owner().cloned().ok_or(TagmarksError::NotSignedIn)
    }

    /// Start a session for `owner`, replacing any existing one
    ///
    /// Subscribes first and then fetches the full collection, so nothing
    /// written in between is missed. If the initial fetch fails the session
    /// stays up and the next change notification retries.
    pub async fn sign_in(&mut self, owner: Owner) -> Result<()> {
        self.sign_out();
        self.state.reset(Some(owner.clone()));

        let feed = self.store.subscribe(&owner).await?;
        let listener = tokio::spawn(listen(
            Arc::clone(&self.store),
            Arc::clone(&self.state),
            owner.clone(),
            feed,
        ));
        self.session = Some(SyncSession {
            owner: owner.clone(),
            listener,
        });
        info!("Signed in as {}", owner);

        refetch(self.store.as_ref(), &self.state, &owner).await
    }

    /// Tear down the session and clear the snapshot
    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Signed out {}", session.owner());
        }
        self.state.reset(None);
    }

    /// Refetch the whole collection now
    pub async fn refresh(&self) -> Result<()> {
        let owner = self.require_owner()?;
        refetch(self.store.as_ref(), &self.state, &owner).await
    }

    /// Validate and persist a new bookmark
    ///
    /// The snapshot is not touched; it picks the row up from the resulting
    /// change notification.
    pub async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        let owner = self.require_owner()?;
        let bookmark = bookmark.validated()?;
        self.store.insert(&owner, bookmark).await
    }

    pub async fn update(&self, id: &str, bookmark: NewBookmark) -> Result<Bookmark> {
        let owner = self.require_owner()?;
        let bookmark = bookmark.validated()?;
        self.store.update(&owner, id, bookmark).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let owner = self.require_owner()?;
        self.store.delete(&owner, id).await
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot.borrow().clone()
    }

    /// Receiver that observes every published snapshot
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.state.snapshot.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Bookmark> {
        self.snapshot().iter().find(|b| b.id == id).cloned()
    }

    /// Filtered view of the current snapshot
    pub fn view(&self, query: &str, selected: &TagSelection) -> Vec<Bookmark> {
        filter::filter(&self.snapshot(), query, selected)
    }

    pub fn tag_universe(&self) -> Vec<String> {
        tags::tag_universe(&self.snapshot())
    }

    /// Decode an exchange document and add its bookmarks
    pub async fn import(&self, document: &str) -> Result<ImportReport> {
        let records = exchange::decode(document)?;
        self.import_records(records).await
    }

    /// Add decoded records, skipping invalid ones and URLs already stored
    pub async fn import_records(&self, records: Vec<NewBookmark>) -> Result<ImportReport> {
        let owner = self.require_owner()?;
        let records = exchange::merge_duplicates(records);

        let mut known: HashSet<String> = self
            .store
            .list(&owner)
            .await?
            .into_iter()
            .map(|b| b.url)
            .collect();

        let mut report = ImportReport::default();
        for record in records {
            let candidate = match record.validated() {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!("Skipping import candidate: {}", e);
                    report.invalid += 1;
                    continue;
                }
            };
            if !known.insert(candidate.url.clone()) {
                report.duplicates += 1;
                continue;
            }
            if let Err(e) = self.store.insert(&owner, candidate).await {
                warn!("Import stopped: {}", report);
                let detail = match e {
                    TagmarksError::Remote(message) => message,
                    other => other.to_string(),
                };
                return Err(TagmarksError::Remote(format!(
                    "import stopped after {} bookmarks were added: {}",
                    report.imported, detail
                )));
            }
            report.imported += 1;
        }

        info!("{}", report);
        Ok(report)
    }
}
