//! Client-side routing.
//!
//! ARCHITECTURE
//! ============
//! [`routes::RouteTable`] turns a location into a [`routes::ResolvedRoute`],
//! [`guard::NavigationGuard`] decides whether the session may enter it, and
//! [`Router`] loops the two until the guard allows a route, tracking where
//! the client currently is.

pub mod guard;
pub mod routes;

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use tracing::info;

pub use guard::{NavigationDecision, NavigationGuard, RedirectTarget, RoutePolicy};
pub use routes::{ResolvedRoute, RouteDescriptor, RouteMeta, RouteTable, default_routes};

/// Guard redirects followed by one [`Router::push`] before giving up.
pub const MAX_GUARD_HOPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation to {from} exceeded {hops} guard redirects (last: {last})")]
    RedirectLoop { from: String, last: String, hops: usize },
}

pub struct Router {
    table: RouteTable,
    guard: NavigationGuard,
    current: Option<ResolvedRoute>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable, guard: NavigationGuard) -> Self {
        Self { table, guard, current: None }
    }

    #[must_use]
    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    /// Navigate to `location`, following guard redirects.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::RedirectLoop`] if the guard keeps
    /// redirecting past [`MAX_GUARD_HOPS`]; the current route is unchanged.
    pub fn push(&mut self, location: &str) -> Result<ResolvedRoute, NavigationError> {
        let mut target = location.to_owned();
        for _ in 0..=MAX_GUARD_HOPS {
            let route = self.table.resolve(&target);
            match self.guard.before_each(&route) {
                NavigationDecision::Allow => {
                    info!(from = location, to = %route.full_path, "navigated");
                    self.current = Some(route.clone());
                    return Ok(route);
                }
                NavigationDecision::Redirect(redirect) => {
                    target = redirect.to_url();
                }
            }
        }
        Err(NavigationError::RedirectLoop { from: location.to_owned(), last: target, hops: MAX_GUARD_HOPS })
    }
}
