//! Small pure helpers shared across modules.

pub mod date;
pub mod encode;
