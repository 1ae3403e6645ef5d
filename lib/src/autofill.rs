//! Debounced title autofill for the add-bookmark form.

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{is_valid_url, MetadataSource, PageMetadata};
use crate::models::NewBookmark;
use crate::tags::parse_tags;
use log::debug;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs only the last of a rapid series of calls
///
/// Each call cancels the pending timer and starts a new one. When a timer
/// fires its task is spawned on its own, so a later call no longer affects
/// work that has already started.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Drop the pending call, if its timer has not fired yet
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Contents of the add-bookmark form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub url: String,
    pub title: String,
    /// Comma-separated, as typed
    pub tags: String,
    pub favicon: Option<String>,
    /// Set once the user types a title; autofill leaves it alone after that
    pub title_edited: bool,
    /// A fetch for the current URL is in flight
    pub fetching: bool,
}

impl FormState {
    pub fn to_new_bookmark(&self) -> Result<NewBookmark> {
        let mut bookmark = NewBookmark::new(&self.url, &self.title, parse_tags(&self.tags));
        bookmark.favicon = self.favicon.clone();
        bookmark.validated()
    }
}

/// Fills in title and favicon as the user types a URL
pub struct TitleAutofill<M: MetadataSource + 'static> {
    source: Arc<M>,
    form: Arc<Mutex<FormState>>,
    debouncer: Debouncer,
}

fn lock(form: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<M: MetadataSource + 'static> TitleAutofill<M> {
    pub fn new(source: Arc<M>, delay: Duration) -> Self {
        Self {
            source,
            form: Arc::new(Mutex::new(FormState::default())),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Quiet period taken from `autofill_debounce_ms`
    pub fn from_config(source: Arc<M>, config: &Config) -> Self {
        Self::new(source, Duration::from_millis(config.autofill_debounce_ms))
    }

    /// Snapshot of the form
    pub fn form(&self) -> FormState {
        lock(&self.form).clone()
    }

    /// URL field changed; schedules a fetch when it parses
    pub fn set_url(&mut self, url: &str) {
        {
            let mut form = lock(&self.form);
            form.url = url.to_string();
            form.fetching = false;
        }

        let url = url.trim().to_string();
        if !is_valid_url(&url) {
            self.debouncer.cancel();
            return;
        }

        let source = Arc::clone(&self.source);
        let form = Arc::clone(&self.form);
        self.debouncer.call(async move {
            lock(&form).fetching = true;
            let result = source.fetch_metadata(&url).await;
            apply(&form, &url, result);
        });
    }

    pub fn set_title(&mut self, title: &str) {
        let mut form = lock(&self.form);
        form.title = title.to_string();
        form.title_edited = true;
    }

    pub fn set_tags(&mut self, tags: &str) {
        lock(&self.form).tags = tags.to_string();
    }

    /// Empty the form and drop any pending fetch
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        *lock(&self.form) = FormState::default();
    }
}

fn apply(form: &Mutex<FormState>, url: &str, result: Result<PageMetadata>) {
    let mut form = lock(form);
    if form.url.trim() != url {
        debug!("Discarding metadata for {}: URL changed", url);
        return;
    }
    form.fetching = false;

    match result {
        Ok(metadata) => {
            if !form.title_edited {
                form.title = metadata.title;
            }
            form.favicon = Some(metadata.favicon).filter(|f| !f.is_empty());
        }
        Err(e) => debug!("No metadata for {}: {}", url, e),
    }
}
