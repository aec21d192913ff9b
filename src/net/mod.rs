//! Networking: request wrapper, wire schema and typed endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` owns the envelope handling every call shares, `types` mirrors
//! the backend's JSON shapes, and `api` names each backend endpoint so
//! screens never build paths by hand.

pub mod api;
pub mod request;
pub mod types;
