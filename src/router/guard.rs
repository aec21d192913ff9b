//! Session-aware navigation guard.
//!
//! Runs before every navigation. Sets the window title from route meta,
//! then decides between letting the navigation through and redirecting.
//! Rules are checked in order and the first match wins:
//!
//! 1. protected route, not logged in: go to login, remembering the target
//! 2. logged in and on the login page: go to the role's landing page
//! 3. logged in as a non-USER role: only admin routes are allowed
//! 4. logged in as USER: admin routes bounce to home
//! 5. anything else is allowed

use std::sync::Arc;

use tracing::debug;

use super::routes::ResolvedRoute;
use crate::platform::Navigator;
use crate::session::SessionStore;
use crate::util::encode::encode_query_value;

pub const REDIRECT_QUERY_KEY: &str = "redirect";

/// Paths the guard redirects between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub login_path: String,
    pub home_path: String,
    /// Matched as a literal string prefix, so `/backup` counts as admin.
    pub admin_prefix: String,
    pub admin_dashboard: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            login_path: "/login".to_owned(),
            home_path: "/".to_owned(),
            admin_prefix: "/back".to_owned(),
            admin_dashboard: "/back/dashboard".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RedirectTarget {
    #[must_use]
    pub fn to(path: &str) -> Self {
        Self { path: path.to_owned(), query: Vec::new() }
    }

    /// `path?k=v&...` with query values encoded for a router location.
    #[must_use]
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query_value(k), encode_query_value(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(RedirectTarget),
}

#[derive(Clone)]
pub struct NavigationGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    policy: RoutePolicy,
    app_title: String,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>, policy: RoutePolicy, app_title: &str) -> Self {
        Self { session, navigator, policy, app_title: app_title.to_owned() }
    }

    #[must_use]
    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    #[must_use]
    pub fn before_each(&self, to: &ResolvedRoute) -> NavigationDecision {
        if let Some(title) = &to.meta.title {
            self.navigator.set_title(&format!("{title} - {}", self.app_title));
        }

        let logged_in = self.session.is_logged_in();
        let is_user = logged_in && self.session.is_user();
        debug!(path = %to.path, logged_in, is_user, "guarding navigation");

        let policy = &self.policy;
        if to.meta.requires_auth && !logged_in {
            return NavigationDecision::Redirect(RedirectTarget {
                path: policy.login_path.clone(),
                query: vec![(REDIRECT_QUERY_KEY.to_owned(), to.full_path.clone())],
            });
        }
        if !logged_in {
            return NavigationDecision::Allow;
        }
        if to.path == policy.login_path {
            let landing = if is_user { &policy.home_path } else { &policy.admin_dashboard };
            return NavigationDecision::Redirect(RedirectTarget::to(landing));
        }

        let admin_route = to.path.starts_with(&policy.admin_prefix);
        match (is_user, admin_route) {
            (false, true) | (true, false) => NavigationDecision::Allow,
            (false, false) => NavigationDecision::Redirect(RedirectTarget::to(&policy.admin_dashboard)),
            (true, true) => NavigationDecision::Redirect(RedirectTarget::to(&policy.home_path)),
        }
    }
}
