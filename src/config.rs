//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1235/api";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_APP_TITLE: &str = "Lost & Found";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown LOSSFIND_PLATFORM: {0} (expected 'web' or 'mini-program')")]
    UnknownPlatform(String),
}

/// Host runtime the client is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformKind {
    /// Browser single-page app.
    #[default]
    Web,
    /// Mini-program shell with page-path routing.
    MiniProgram,
}

impl PlatformKind {
    /// Page relaunched after the server reports an expired session.
    #[must_use]
    pub fn login_route(self) -> &'static str {
        match self {
            Self::Web => "/login",
            Self::MiniProgram => "/pages/auth/login",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every request path, without a trailing slash.
    pub base_url: String,
    pub platform: PlatformKind,
    /// Delay between a 401 toast and the login relaunch.
    pub redirect_delay: Duration,
    pub timeouts: Timeouts,
    /// Suffix appended to page titles.
    pub app_title: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            platform: PlatformKind::Web,
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            app_title: DEFAULT_APP_TITLE.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LOSSFIND_BASE_URL`: default `http://localhost:1235/api`
    /// - `LOSSFIND_PLATFORM`: `web` (default) or `mini-program`
    /// - `LOSSFIND_REDIRECT_DELAY_MS`: default 1500
    /// - `LOSSFIND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LOSSFIND_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LOSSFIND_APP_TITLE`: default `Lost & Found`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] for an unrecognized platform name.
    pub fn from_env() -> Result<Self, ConfigError> {
        let platform = parse_platform(std::env::var("LOSSFIND_PLATFORM").ok().as_deref())?;
        let base_url = normalize_base_url(
            &std::env::var("LOSSFIND_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        );
        let redirect_delay =
            Duration::from_millis(env_parse("LOSSFIND_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS));
        let timeouts = Timeouts {
            request_secs: env_parse("LOSSFIND_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LOSSFIND_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let app_title = std::env::var("LOSSFIND_APP_TITLE").unwrap_or_else(|_| DEFAULT_APP_TITLE.to_owned());

        Ok(Self { base_url, platform, redirect_delay, timeouts, app_title })
    }

    /// Override the base URL, normalizing the trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn login_route(&self) -> &'static str {
        self.platform.login_route()
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_platform(raw: Option<&str>) -> Result<PlatformKind, ConfigError> {
    match raw.unwrap_or("web") {
        "web" => Ok(PlatformKind::Web),
        "mini-program" | "mp" => Ok(PlatformKind::MiniProgram),
        other => Err(ConfigError::UnknownPlatform(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
