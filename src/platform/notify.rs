//! Toast and loading-indicator surface.

use std::time::Duration;

use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastIcon {
    Success,
    Info,
    /// Text only; used for failures.
    Plain,
}

impl ToastIcon {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Plain => "none",
        }
    }
}

pub trait Notifier: Send + Sync {
    fn show_loading(&self, title: &str);
    fn hide_loading(&self);
    fn show_toast(&self, title: &str, icon: ToastIcon, duration: Duration);
}

/// Shows the loading indicator for as long as it is alive.
#[must_use = "dropping the guard hides the loading indicator immediately"]
pub struct LoadingGuard<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> LoadingGuard<'a> {
    pub fn show(notifier: &'a dyn Notifier, title: &str) -> Self {
        notifier.show_loading(title);
        Self { notifier }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

/// Renders UI notifications as log events, for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_loading(&self, title: &str) {
        debug!(title, "loading shown");
    }

    fn hide_loading(&self) {
        debug!("loading hidden");
    }

    fn show_toast(&self, title: &str, icon: ToastIcon, duration: Duration) {
        info!(icon = icon.as_str(), duration_ms = duration.as_millis(), "{title}");
    }
}
