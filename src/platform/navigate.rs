//! Page-level navigation surface used outside the router.

use tracing::info;

pub trait Navigator: Send + Sync {
    /// Discard the page stack and open `path`.
    fn relaunch(&self, path: &str);
    fn set_title(&self, title: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn relaunch(&self, path: &str) {
        info!(path, "relaunch");
    }

    fn set_title(&self, title: &str) {
        info!(title, "document title");
    }
}
