//! Route guards

use super::SessionStore;
use crate::config::AuthConfig;

/// Decision for a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Go to this route instead
    Redirect(String),
}

impl GuardOutcome {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Require a valid session; otherwise send the user to login, remembering
/// where they were going
pub fn auth_guard(store: &SessionStore, attempted_url: &str) -> GuardOutcome {
    if store.is_authenticated() {
        return GuardOutcome::Allow;
    }
    let return_url = url::form_urlencoded::byte_serialize(attempted_url.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    GuardOutcome::Redirect(format!("{}?returnUrl={return_url}", AuthConfig::LOGIN_ROUTE))
}

/// Require a valid session holding `role`
pub fn role_guard(store: &SessionStore, role: &str) -> GuardOutcome {
    if store.is_authenticated() && store.has_role(role) {
        GuardOutcome::Allow
    } else {
        GuardOutcome::Redirect(AuthConfig::UNAUTHORIZED_ROUTE.to_string())
    }
}
