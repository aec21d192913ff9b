//! Interval polling.
//!
//! DESIGN
//! ======
//! A poller owns one background task that fetches on a fixed interval and
//! publishes `{ data, loading, error }` through a `watch` channel. Screens
//! subscribe for changes or take a snapshot. The task is aborted on `stop`
//! and on drop, so a poller never outlives its owner.
//!
//! ERROR HANDLING
//! ==============
//! Fetch failures are recorded in the state and logged; polling continues.
//! The previous `data` is kept when a fetch fails.

use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::net::api;
use crate::net::request::HttpClient;
use crate::platform::{Notifier, ToastIcon};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const NOTIFICATION_POLL_INTERVAL: Duration = Duration::from_secs(60);

const NEW_NOTIFICATION_TOAST: Duration = Duration::from_millis(3000);

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RealtimeState<T> {
    fn default() -> Self {
        Self { data: None, loading: false, error: None }
    }
}

// =============================================================================
// REALTIME DATA
// =============================================================================

pub struct RealtimeData<T> {
    fetch: Fetcher<T>,
    interval: Duration,
    immediate: bool,
    state: Arc<watch::Sender<RealtimeState<T>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<T> RealtimeData<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Poll `fetch` every [`DEFAULT_POLL_INTERVAL`], fetching once on start.
    pub fn new<F, Fut, E>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let fetch: Fetcher<T> = Arc::new(move || {
            let fut = fetch();
            async move { fut.await.map_err(|e| e.to_string()) }.boxed()
        });
        let (state, _) = watch::channel(RealtimeState::default());
        Self {
            fetch,
            interval: DEFAULT_POLL_INTERVAL,
            immediate: true,
            state: Arc::new(state),
            timer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether `start` fetches right away or waits one interval.
    #[must_use]
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the timer; a no-op when already running or outside a tokio
    /// runtime.
    pub fn start(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_some() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; polling not started");
            return;
        };

        let fetch = self.fetch.clone();
        let state = self.state.clone();
        let interval = self.interval;
        let immediate = self.immediate;
        debug!(?interval, immediate, "polling started");
        *timer = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            if immediate {
                run_fetch(&fetch, &state).await;
            }
            loop {
                ticker.tick().await;
                run_fetch(&fetch, &state).await;
            }
        }));
    }

    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
            debug!("polling stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Fetch once now, independent of the timer.
    pub async fn refresh(&self) {
        run_fetch(&self.fetch, &self.state).await;
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RealtimeState<T>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> RealtimeState<T> {
        self.state.borrow().clone()
    }
}

impl<T> Drop for RealtimeData<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

async fn run_fetch<T>(fetch: &Fetcher<T>, state: &watch::Sender<RealtimeState<T>>) {
    state.send_modify(|s| {
        s.loading = true;
        s.error = None;
    });
    let result = fetch().await;
    state.send_modify(|s| {
        s.loading = false;
        match result {
            Ok(data) => s.data = Some(data),
            Err(e) => {
                warn!(error = %e, "realtime fetch failed");
                s.error = Some(e);
            }
        }
    });
}

// =============================================================================
// NOTIFICATION POLLING
// =============================================================================

/// Tracks the unread count between polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadTracker {
    count: u64,
}

impl UnreadTracker {
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record a new count. Returns how many notifications arrived when the
    /// count rose from a non-zero value.
    pub fn observe(&mut self, count: u64) -> Option<u64> {
        if count == self.count {
            return None;
        }
        let announced = (count > self.count && self.count > 0).then(|| count - self.count);
        self.count = count;
        announced
    }
}

/// Polls the unread notification count and toasts when new ones arrive.
pub struct NotificationPolling {
    poller: RealtimeData<u64>,
    tracker: Arc<Mutex<UnreadTracker>>,
}

impl NotificationPolling {
    #[must_use]
    pub fn new(http: HttpClient, notifier: Arc<dyn Notifier>) -> Self {
        let tracker = Arc::new(Mutex::new(UnreadTracker::default()));
        let shared = tracker.clone();
        let poller = RealtimeData::new(move || {
            let http = http.clone();
            let notifier = notifier.clone();
            let tracker = shared.clone();
            async move {
                let count = api::notification::unread_count(&http).await.unwrap_or_else(|e| {
                    warn!(error = %e, "unread count fetch failed; treating as 0");
                    0
                });
                let announced = tracker.lock().unwrap_or_else(PoisonError::into_inner).observe(count);
                if let Some(new) = announced {
                    notifier.show_toast(&format!("You have {new} new notifications"), ToastIcon::Info, NEW_NOTIFICATION_TOAST);
                }
                Ok::<_, std::convert::Infallible>(count)
            }
        })
        .with_interval(NOTIFICATION_POLL_INTERVAL);
        Self { poller, tracker }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poller = self.poller.with_interval(interval);
        self
    }

    #[must_use]
    pub fn unread_count(&self) -> u64 {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner).count()
    }

    pub fn start(&self) {
        self.poller.start();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }

    pub async fn refresh(&self) {
        self.poller.refresh().await;
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RealtimeState<u64>> {
        self.poller.subscribe()
    }
}
