//! Session record and authentication phases

use crate::config::AuthConfig;
use arrosage_http::types::UserProfile;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use std::fmt;

/// A complete authenticated session
///
/// Both tokens are always present together; a record missing either one is
/// never materialised as a `Session`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at_ms: i64,
    pub user: UserProfile,
}

impl Session {
    /// Whether the access token must be considered expired at `now_ms`
    pub const fn is_expired_at(&self, now_ms: i64) -> bool {
        is_expired(self.expires_at_ms, now_ms)
    }
}

/// Expiry check with the safety margin applied
pub const fn is_expired(expires_at_ms: i64, now_ms: i64) -> bool {
    now_ms >= expires_at_ms.saturating_sub(AuthConfig::EXPIRY_MARGIN_MS)
}

/// Where the store is in its login/renewal lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    NoSession,
    Authenticating,
    Authenticated,
    Refreshing,
    LoggedOut,
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoSession => "no-session",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Refreshing => "refreshing",
            Self::LoggedOut => "logged-out",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT, in epoch milliseconds
///
/// The signature is not checked; the value only schedules renewal.
pub fn jwt_expiry_ms(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    claim.exp?.checked_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn test_expiry_margin_boundary() {
        let expires_at = 1_700_000_000_000;
        assert!(!is_expired(expires_at, expires_at - 60_001));
        assert!(is_expired(expires_at, expires_at - 60_000));
        assert!(is_expired(expires_at, expires_at + 1));
    }

    #[test]
    fn test_jwt_expiry_is_read_in_millis() {
        let token = token_with(&json!({"sub": "admin", "exp": 1_700_000_000}));
        assert_eq!(jwt_expiry_ms(&token), Some(1_700_000_000_000));
    }

    #[test]
    fn test_jwt_expiry_missing_or_garbage() {
        assert_eq!(jwt_expiry_ms("not-a-jwt"), None);
        assert_eq!(jwt_expiry_ms("a.%%%.c"), None);
        let token = token_with(&json!({"sub": "admin"}));
        assert_eq!(jwt_expiry_ms(&token), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(AuthPhase::Refreshing.to_string(), "refreshing");
    }
}
