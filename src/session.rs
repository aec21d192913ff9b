//! Persisted login session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is three independent storage keys (`token`, `userInfo`,
//! `role`). The HTTP client reads the token for every request and clears
//! the keys on a 401; the navigation guard reads login state and role.
//!
//! TRADE-OFFS
//! ==========
//! The keys are written one at a time, so a crash between writes can leave
//! a token without a profile. Readers treat each key on its own and a
//! malformed profile as absent, which keeps that state recoverable.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::net::api;
use crate::net::request::{ApiError, HttpClient};
use crate::net::types::{LoginForm, RoleCode, UserProfile};
use crate::platform::{KeyValueStorage, StorageError};

pub const TOKEN_KEY: &str = "token";
pub const USER_INFO_KEY: &str = "userInfo";
pub const ROLE_KEY: &str = "role";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("profile encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid login payload: {0}")]
    InvalidPayload(String),
}

/// Cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Persisted token, or empty.
    #[must_use]
    pub fn token(&self) -> String {
        self.storage.get(TOKEN_KEY).unwrap_or_default()
    }

    /// Stored profile; `None` when missing, empty or malformed.
    #[must_use]
    pub fn user_info(&self) -> Option<UserProfile> {
        self.stored_profile().map(UserProfile::from)
    }

    /// Raw profile object as persisted.
    fn stored_profile(&self) -> Option<serde_json::Map<String, Value>> {
        let raw = self.storage.get(USER_INFO_KEY)?;
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => Some(fields),
            Ok(Value::Null) => None,
            Ok(other) => {
                debug!(kind = json_kind(&other), "stored user profile is not an object; ignoring");
                None
            }
            Err(e) => {
                debug!(error = %e, "stored user profile is malformed; ignoring");
                None
            }
        }
    }

    /// Persisted role code, or empty.
    #[must_use]
    pub fn role(&self) -> String {
        self.storage.get(ROLE_KEY).unwrap_or_default()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.token().is_empty()
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.profile_role() == Some(RoleCode::User)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile_role() == Some(RoleCode::Admin)
    }

    fn profile_role(&self) -> Option<RoleCode> {
        let profile = self.stored_profile()?;
        profile.get("roleCode").and_then(Value::as_str).and_then(RoleCode::parse)
    }

    /// Store a login payload.
    ///
    /// The profile is `payload.userInfo` when present and truthy, otherwise
    /// the payload itself. `null` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if a write fails; earlier writes
    /// are not rolled back.
    pub fn set_user_info(&self, payload: &Value) -> Result<(), SessionError> {
        if payload.is_null() {
            return Ok(());
        }
        let profile = payload
            .get(USER_INFO_KEY)
            .filter(|v| is_truthy(v))
            .unwrap_or(payload);
        let token = payload.get(TOKEN_KEY).and_then(Value::as_str).unwrap_or("");
        let role = profile.get("roleCode").and_then(Value::as_str).unwrap_or("");

        self.storage.set(USER_INFO_KEY, &serde_json::to_string(profile)?)?;
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(ROLE_KEY, role)?;
        Ok(())
    }

    /// Overwrite the stored profile; token and role are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if encoding or the write fails.
    pub fn update_user_info(&self, profile: &UserProfile) -> Result<(), SessionError> {
        self.storage.set(USER_INFO_KEY, &serde_json::to_string(profile)?)?;
        Ok(())
    }

    /// Remove all three keys. Every removal is attempted; the first failure
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if any removal fails.
    pub fn clear_user_info(&self) -> Result<(), SessionError> {
        let mut first_err = None;
        for key in [USER_INFO_KEY, TOKEN_KEY, ROLE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// `POST /user/login`, then persist the response.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] when the request fails and
    /// [`SessionError::InvalidPayload`] when the stored profile cannot be
    /// read back.
    pub async fn login(&self, http: &HttpClient, credentials: &LoginForm) -> Result<UserProfile, SessionError> {
        let payload = api::auth::login(http, credentials).await?;
        self.set_user_info(&payload)?;
        let profile = self
            .user_info()
            .ok_or_else(|| SessionError::InvalidPayload("no user profile in login response".to_owned()))?;
        info!(username = profile.username.as_deref().unwrap_or(""), role = %self.role(), "logged in");
        Ok(profile)
    }

    /// # Errors
    ///
    /// See [`Self::clear_user_info`].
    pub fn logout(&self) -> Result<(), SessionError> {
        self.clear_user_info()?;
        info!("logged out");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
