//! Lost-and-found client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Frontends (browser SPA, mini-program shell, the `cli` binary) call into
//! this crate for session state, authenticated HTTP requests and
//! session-gated navigation. Everything platform-specific (storage, network,
//! toasts, page relaunch) arrives through the adapter traits in [`platform`],
//! wired once in [`app::App`].
//!
//! MODULE MAP
//! ==========
//! - [`session`]: token + cached profile over durable key-value storage
//! - [`net`]: request wrapper, wire types, typed endpoints
//! - [`router`]: route table, navigation guard, router
//! - [`hooks`]: polling, debounce and autosave timers
//! - [`util`]: date formatting and URI encoding

pub mod app;
pub mod config;
pub mod hooks;
pub mod net;
pub mod platform;
pub mod router;
pub mod session;
pub mod util;

pub use app::App;
pub use config::ClientConfig;
pub use net::request::{ApiError, HttpClient, RequestOptions};
pub use session::SessionStore;
