//! Trailing-edge debouncing.
//!
//! Each call replaces the pending timer, so only the last value within the
//! delay window reaches the action. Once the timer fires the action runs on
//! its own task: a later call or `cancel` stops the next run, never one that
//! has already started.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let action: Action<T> = Arc::new(move |value| action(value).boxed());
        Self { delay, action, pending: Mutex::new(None) }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing any pending call. Dropped with a warning
    /// outside a tokio runtime.
    pub fn call(&self, value: T) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; debounced call dropped");
            return;
        };
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let action = self.action.clone();
        let delay = self.delay;
        let spawner = runtime.clone();
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            spawner.spawn(action(value));
        }));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
            debug!("debounced call cancelled");
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Debounced search box.
pub struct SearchDebounce {
    debouncer: Debouncer<String>,
    searching: Arc<AtomicBool>,
    text: Mutex<String>,
}

impl SearchDebounce {
    /// Run `search` [`DEFAULT_SEARCH_DELAY`] after the last keystroke.
    pub fn new<F, Fut, E>(search: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        Self::with_delay(DEFAULT_SEARCH_DELAY, search)
    }

    pub fn with_delay<F, Fut, E>(delay: Duration, search: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let searching = Arc::new(AtomicBool::new(false));
        let flag = searching.clone();
        let search = Arc::new(search);
        let debouncer = Debouncer::new(delay, move |query: String| {
            let flag = flag.clone();
            let search = search.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
                if let Err(e) = search(query.clone()).await {
                    warn!(query = %query, error = %e, "search failed");
                }
                flag.store(false, Ordering::SeqCst);
            }
        });
        Self { debouncer, searching, text: Mutex::new(String::new()) }
    }

    /// Update the search text and schedule a search for it.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone_from(&text);
        self.debouncer.call(text);
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
