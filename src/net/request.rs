//! Authenticated request wrapper shared by every backend call.
//!
//! DESIGN
//! ======
//! One pipeline handles all calls: attach the session token, hold the
//! loading indicator, unwrap the `{ code, data, msg }` envelope, toast the
//! outcome, and map failures to [`ApiError`]. A 401 tears the session down
//! and relaunches the login page after a short delay so the toast stays
//! readable.
//!
//! ERROR HANDLING
//! ==============
//! HTTP status is not consulted; only the envelope code decides success.
//! Nothing is retried. Callers get a `Result` and decide whether to react
//! beyond the toast already shown.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::types::{ApiEnvelope, ResponseCode};
use crate::config::ClientConfig;
use crate::platform::{
    HttpMethod, HttpRequest, HttpTransport, LoadingGuard, Navigator, Notifier, Platform, ToastIcon, TransportError,
    TransportResponse,
};
use crate::session::SessionStore;
use crate::util::encode::encode_component;

pub const LOADING_TITLE: &str = "Loading...";
pub const DEFAULT_SUCCESS_MSG: &str = "Operation succeeded";
pub const DEFAULT_ERROR_MSG: &str = "Request failed";
pub const SESSION_EXPIRED_MSG: &str = "Session expired, please log in again";
pub const NETWORK_ERROR_MSG: &str = "Network connection failed, please check your network";

pub const TOKEN_HEADER: &str = "token";

const EXPLICIT_SUCCESS_TOAST: Duration = Duration::from_millis(2000);
const DEFAULT_SUCCESS_TOAST: Duration = Duration::from_millis(1500);
const ERROR_TOAST: Duration = Duration::from_millis(2500);

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },

    /// The server answered with a non-success code.
    #[error("{message}")]
    Application { code: Option<ResponseCode>, message: String, data: Value },

    /// The server rejected the session token (code 401).
    #[error("{message}")]
    AuthExpired { code: ResponseCode, message: String, data: Value },

    /// `data` did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn code(&self) -> Option<&ResponseCode> {
        match self {
            Self::Application { code, .. } => code.as_ref(),
            Self::AuthExpired { code, .. } => Some(code),
            Self::Transport { .. } | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message, .. }
            | Self::Application { message, .. }
            | Self::AuthExpired { message, .. } => message.clone(),
            Self::Decode(_) => self.to_string(),
        }
    }

    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Per-call presentation overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Toast default success/error messages.
    pub show_default_msg: bool,
    /// Success toast shown regardless of method; empty means unset.
    pub success_msg: String,
    /// Replaces the server/network message in failure toasts; empty means unset.
    pub error_msg: String,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { show_default_msg: true, success_msg: String::new(), error_msg: String::new(), headers: Vec::new() }
    }
}

impl RequestOptions {
    /// No default toasts; explicit messages still show.
    #[must_use]
    pub fn quiet() -> Self {
        Self { show_default_msg: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_success_msg(mut self, msg: impl Into<String>) -> Self {
        self.success_msg = msg.into();
        self
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = msg.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap to clone; clones share the session and adapters.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: String,
    login_route: String,
    redirect_delay: Duration,
    session: SessionStore,
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl HttpClient {
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore, platform: &Platform) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url: config.base_url.clone(),
                login_route: config.login_route().to_owned(),
                redirect_delay: config.redirect_delay,
                session,
                transport: platform.transport.clone(),
                notifier: platform.notifier.clone(),
                navigator: platform.navigator.clone(),
            }),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Issue one request and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response arrives,
    /// [`ApiError::AuthExpired`] for code 401 (after clearing the session),
    /// and [`ApiError::Application`] for any other non-200 code.
    pub async fn request_value(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let inner = &*self.inner;
        let request = HttpRequest {
            method,
            url: format!("{}{path}", inner.base_url),
            headers: self.build_headers(options),
            body,
        };
        debug!(%method, url = %request.url, "sending request");

        let loading = LoadingGuard::show(inner.notifier.as_ref(), LOADING_TITLE);
        let result = inner.transport.send(request).await;
        drop(loading);

        match result {
            Ok(response) => self.handle_response(path, method, response, options),
            Err(source) => Err(self.handle_transport_failure(path, method, source, options)),
        }
    }

    /// [`Self::request_value`] with `data` decoded into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::request_value`], plus [`ApiError::Decode`] when `data`
    /// does not deserialize into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let data = self.request_value(path, method, body, options).await?;
        serde_json::from_value(data).map_err(|e| {
            warn!(path, error = %e, "response data decode failed");
            ApiError::Decode(e.to_string())
        })
    }

    /// GET with `params` appended as a query string.
    ///
    /// `params` must serialize to an object (or `()`/`null` for none); null
    /// and empty-string values are dropped.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get<T, Q>(&self, path: &str, params: &Q, options: &RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = with_query(path, params)?;
        self.request(&url, HttpMethod::Get, None, options).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(path, HttpMethod::Post, Some(body), options).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.request(path, HttpMethod::Put, Some(body), options).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T, ApiError> {
        self.request(path, HttpMethod::Delete, None, options).await
    }

    fn build_headers(&self, options: &RequestOptions) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }
        let token = self.inner.session.token();
        if !token.is_empty() {
            set_header(&mut headers, TOKEN_HEADER, &token);
        }
        headers
    }

    fn handle_response(
        &self,
        path: &str,
        method: HttpMethod,
        response: TransportResponse,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let envelope = serde_json::from_str::<ApiEnvelope>(&response.body).unwrap_or_else(|e| {
            warn!(path, status = response.status, error = %e, "response body is not an envelope");
            ApiEnvelope::default()
        });

        match envelope.code {
            Some(code) if code.is_success() => {
                self.toast_success(method, options);
                Ok(envelope.data)
            }
            Some(code) if code.is_auth_expired() => {
                warn!(path, %method, "session expired; clearing session");
                self.expire_session(options);
                Err(ApiError::AuthExpired { code, message: SESSION_EXPIRED_MSG.to_owned(), data: envelope.data })
            }
            code => {
                let message = envelope
                    .msg
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_ERROR_MSG.to_owned());
                warn!(path, %method, code = ?code, %message, "request rejected");
                if options.show_default_msg || !options.error_msg.is_empty() {
                    let title = if options.error_msg.is_empty() { &message } else { &options.error_msg };
                    self.inner.notifier.show_toast(title, ToastIcon::Plain, ERROR_TOAST);
                }
                Err(ApiError::Application { code, message, data: envelope.data })
            }
        }
    }

    fn handle_transport_failure(
        &self,
        path: &str,
        method: HttpMethod,
        source: TransportError,
        options: &RequestOptions,
    ) -> ApiError {
        warn!(path, %method, error = %source, "transport failure");
        let message = if options.error_msg.is_empty() { NETWORK_ERROR_MSG.to_owned() } else { options.error_msg.clone() };
        if options.show_default_msg {
            self.inner.notifier.show_toast(&message, ToastIcon::Plain, ERROR_TOAST);
        }
        ApiError::Transport { message, source }
    }

    fn toast_success(&self, method: HttpMethod, options: &RequestOptions) {
        let notifier = &self.inner.notifier;
        if !options.success_msg.is_empty() {
            notifier.show_toast(&options.success_msg, ToastIcon::Success, EXPLICIT_SUCCESS_TOAST);
        } else if options.show_default_msg && method != HttpMethod::Get {
            notifier.show_toast(DEFAULT_SUCCESS_MSG, ToastIcon::Success, DEFAULT_SUCCESS_TOAST);
        }
    }

    fn expire_session(&self, options: &RequestOptions) {
        let inner = &*self.inner;
        if let Err(e) = inner.session.clear_user_info() {
            warn!(error = %e, "failed to clear expired session");
        }
        if options.show_default_msg || !options.error_msg.is_empty() {
            let title = if options.error_msg.is_empty() { SESSION_EXPIRED_MSG } else { options.error_msg.as_str() };
            inner.notifier.show_toast(title, ToastIcon::Plain, ERROR_TOAST);
        }
        self.schedule_login_relaunch();
    }

    fn schedule_login_relaunch(&self) {
        let navigator = self.inner.navigator.clone();
        let route = self.inner.login_route.clone();
        let delay = self.inner.redirect_delay;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                info!(route = %route, "relaunching login after session expiry");
                navigator.relaunch(&route);
            });
        } else {
            info!(route = %route, "no async runtime; relaunching login immediately");
            navigator.relaunch(&route);
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(slot) = headers
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
    {
        slot.1 = value.to_owned();
    } else {
        headers.push((name.to_owned(), value.to_owned()));
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body encode failed: {e}")))
}

/// Render `params` as `key=value` pairs joined by `&`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if `params` does not serialize to an object.
pub fn build_query<Q: Serialize + ?Sized>(params: &Q) -> Result<String, ApiError> {
    let value = serde_json::to_value(params).map_err(|e| ApiError::Decode(format!("query encode failed: {e}")))?;
    let map = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => return Err(ApiError::Decode(format!("query params must be an object, got {other}"))),
    };
    let pairs: Vec<String> = map
        .iter()
        .filter_map(|(key, value)| query_value(value).map(|v| format!("{key}={}", encode_component(&v))))
        .collect();
    Ok(pairs.join("&"))
}

fn with_query<Q: Serialize + ?Sized>(path: &str, params: &Q) -> Result<String, ApiError> {
    let query = build_query(params)?;
    if query.is_empty() { Ok(path.to_owned()) } else { Ok(format!("{path}?{query}")) }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| query_value(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
