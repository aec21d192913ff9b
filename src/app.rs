//! Composition root.
//!
//! Every frontend builds exactly one [`App`] from a [`ClientConfig`] and a
//! [`Platform`] adapter bundle. The session, HTTP client and router built
//! here share the same storage and UI adapters, so a 401 seen by any request
//! is visible to the guard on the next navigation.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use tracing::info;

use crate::config::ClientConfig;
use crate::hooks::NotificationPolling;
use crate::net::request::HttpClient;
use crate::platform::Platform;
use crate::router::{NavigationGuard, RoutePolicy, RouteTable, Router, default_routes};
use crate::session::SessionStore;

pub struct App {
    pub config: ClientConfig,
    pub platform: Platform,
    pub session: SessionStore,
    pub http: HttpClient,
    pub router: Router,
}

impl App {
    /// Wire the default route table and guard policy.
    #[must_use]
    pub fn new(config: ClientConfig, platform: Platform) -> Self {
        Self::with_routes(config, platform, RouteTable::new(&default_routes()), RoutePolicy::default())
    }

    #[must_use]
    pub fn with_routes(config: ClientConfig, platform: Platform, routes: RouteTable, policy: RoutePolicy) -> Self {
        let session = SessionStore::new(platform.storage.clone());
        let http = HttpClient::new(&config, session.clone(), &platform);
        let guard = NavigationGuard::new(session.clone(), platform.navigator.clone(), policy, &config.app_title);
        let router = Router::new(routes, guard);
        info!(
            base_url = %config.base_url,
            platform = ?config.platform,
            login_route = config.login_route(),
            "client initialized"
        );
        Self { config, platform, session, http, router }
    }

    /// Unread-notification poller bound to this app's client and notifier.
    #[must_use]
    pub fn notification_polling(&self) -> NotificationPolling {
        NotificationPolling::new(self.http.clone(), self.platform.notifier.clone())
    }
}
