//! Timer-driven helpers for screens: polling, debounced search and draft
//! autosave.
//!
//! All timers are tokio tasks owned by the helper that started them and
//! aborted when it stops or is dropped. Failures inside a timer are logged
//! and never surface to the caller.

pub mod autosave;
pub mod debounce;
pub mod polling;

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

pub use autosave::AutoSave;
pub use debounce::{Debouncer, SearchDebounce};
pub use polling::{NotificationPolling, RealtimeData, RealtimeState, UnreadTracker};
