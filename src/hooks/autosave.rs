//! Debounced draft autosave.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::debounce::Debouncer;
use crate::platform::{Notifier, ToastIcon};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);
pub const AUTOSAVE_SUCCESS_MSG: &str = "Draft saved automatically";

const AUTOSAVE_TOAST: Duration = Duration::from_millis(1500);

/// Saves the latest draft once edits pause for the delay.
pub struct AutoSave<T> {
    debouncer: Debouncer<T>,
    saving: Arc<AtomicBool>,
    last_saved: Arc<Mutex<Option<OffsetDateTime>>>,
}

impl<T: Send + 'static> AutoSave<T> {
    pub fn new<F, Fut, E>(save: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        Self::with_delay(DEFAULT_AUTOSAVE_DELAY, save, notifier)
    }

    pub fn with_delay<F, Fut, E>(delay: Duration, save: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let saving = Arc::new(AtomicBool::new(false));
        let last_saved = Arc::new(Mutex::new(None));
        let save = Arc::new(save);

        let flag = saving.clone();
        let stamp = last_saved.clone();
        let debouncer = Debouncer::new(delay, move |draft: T| {
            let flag = flag.clone();
            let stamp = stamp.clone();
            let save = save.clone();
            let notifier = notifier.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
                match save(draft).await {
                    Ok(()) => {
                        let now = OffsetDateTime::now_utc();
                        *stamp.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);
                        info!(saved_at = %now, "draft autosaved");
                        notifier.show_toast(AUTOSAVE_SUCCESS_MSG, ToastIcon::Success, AUTOSAVE_TOAST);
                    }
                    Err(e) => warn!(error = %e, "autosave failed"),
                }
                flag.store(false, Ordering::SeqCst);
            }
        });
        Self { debouncer, saving, last_saved }
    }

    /// Schedule `draft` for saving, replacing any pending draft.
    pub fn save(&self, draft: T) {
        self.debouncer.call(draft);
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<OffsetDateTime> {
        *self.last_saved.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
