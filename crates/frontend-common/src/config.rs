//! Frontend configuration

use arrosage_http::{ArrosageClient, ClientError};
use std::time::Duration;

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Tokens are treated as expired this long before their stated expiry
    pub const EXPIRY_MARGIN_MS: i64 = 60_000;

    /// Lifetime assumed for a renewed token whose expiry cannot be read
    pub const DEFAULT_TOKEN_LIFETIME_MS: i64 = 3_600_000;

    /// Storage key for the access token
    pub const ACCESS_TOKEN_KEY: &'static str = "irrigation_access_token";

    /// Storage key for the refresh token
    pub const REFRESH_TOKEN_KEY: &'static str = "irrigation_refresh_token";

    /// Storage key for the serialized user profile
    pub const USER_KEY: &'static str = "irrigation_user";

    /// Storage key for the access token expiry (epoch milliseconds)
    pub const TOKEN_EXPIRY_KEY: &'static str = "irrigation_token_expiry";

    /// Every key making up the persisted session record
    pub const SESSION_KEYS: [&'static str; 4] = [
        Self::ACCESS_TOKEN_KEY,
        Self::REFRESH_TOKEN_KEY,
        Self::USER_KEY,
        Self::TOKEN_EXPIRY_KEY,
    ];

    /// Route of the login view
    pub const LOGIN_ROUTE: &'static str = "/login";

    /// Route shown when a role check fails
    pub const UNAUTHORIZED_ROUTE: &'static str = "/unauthorized";

    /// Message carried by every error caused by a failed renewal
    pub const SESSION_EXPIRED_MESSAGE: &'static str = "Session expired. Please login again.";
}

/// Environment variable holding the API base URL outside the browser
pub const API_URL_ENV: &str = "ARROSAGE_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Connection settings for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the API gateway, without trailing slash
    pub api_base_url: String,
    /// Request timeout (native targets only)
    pub timeout: Option<Duration>,
    /// User agent sent with every request
    pub user_agent: Option<String>,
}

impl FrontendConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            timeout: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Configuration for the running environment
    ///
    /// In the browser the API is served from the page origin; elsewhere the
    /// URL comes from `ARROSAGE_API_URL`.
    pub fn from_env() -> Self {
        Self::new(get_base_url())
    }

    /// Build the HTTP client described by this configuration
    pub fn client(&self) -> Result<ArrosageClient, ClientError> {
        let mut builder = ArrosageClient::builder().base_url(&self.api_base_url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.build()
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Get the base URL for API calls
#[cfg(target_arch = "wasm32")]
fn get_base_url() -> String {
    // Try to get from window location
    if let Some(window) = web_sys::window()
        && let Ok(location) = window.location().origin()
    {
        return location;
    }

    DEFAULT_API_URL.to_string()
}

/// Get the base URL for API calls
#[cfg(not(target_arch = "wasm32"))]
fn get_base_url() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys_are_distinct() {
        let mut keys = AuthConfig::SESSION_KEYS.to_vec();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_client_from_config() {
        let config = FrontendConfig::new("http://api.example.com/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("arrosage-test");
        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://api.example.com");
    }
}
