//! Host-platform adapters.
//!
//! ARCHITECTURE
//! ============
//! The core never touches platform storage, networking or UI directly. Each
//! concern is a trait here, and a [`Platform`] bundle carries one
//! implementation of each into [`crate::app::App`]. Browser, mini-program and
//! CLI hosts differ only in which bundle they build at startup.

pub mod navigate;
pub mod notify;
pub mod storage;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

pub use navigate::{Navigator, TracingNavigator};
pub use notify::{LoadingGuard, Notifier, ToastIcon, TracingNotifier};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport, TransportError, TransportResponse};

/// One adapter per platform concern.
#[derive(Clone)]
pub struct Platform {
    pub storage: Arc<dyn KeyValueStorage>,
    pub transport: Arc<dyn HttpTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl Platform {
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { storage, transport, notifier, navigator }
    }
}
