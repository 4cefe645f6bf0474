//! Session store
//!
//! Single owner of the persisted session record. Everything that writes the
//! access token, refresh token, user profile or expiry goes through here; the
//! request gate only reads credentials and asks for renewal.
//!
//! Renewal is serialised by `renewal`. Each write to the token record bumps a
//! generation counter, so a caller that queued behind an in-flight renewal can
//! tell that the tokens it saw are already stale and reuse the outcome
//! instead of issuing a second round-trip. The same counter guards the
//! renewal's own outcome: if a logout or login lands while the refresh call is
//! in flight, the renewed tokens are dropped and the failure path leaves the
//! newer session alone.

use super::clock::{Clock, SystemClock};
use super::navigation::{Navigator, default_navigator};
use super::roles;
use super::session::{AuthPhase, Session, is_expired, jwt_expiry_ms};
use super::storage::{SessionStorage, default_storage};
use crate::config::AuthConfig;
use arrosage_http::types::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use arrosage_http::{ArrosageClient, ClientError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Access token as seen at a given generation of the session record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub generation: u64,
}

struct StoreState {
    phase: AuthPhase,
    generation: u64,
    /// Lifetime granted at the last login, reused for renewed tokens
    token_lifetime_ms: Option<i64>,
}

/// What was found in storage at startup
enum Persisted {
    Empty,
    Complete(Session),
    Damaged,
}

fn session_expired() -> ClientError {
    ClientError::SessionExpired(AuthConfig::SESSION_EXPIRED_MESSAGE.to_string())
}

/// Source of truth for who is logged in and which token to present
pub struct SessionStore {
    client: ArrosageClient,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
    user: watch::Sender<Option<UserProfile>>,
    renewal: tokio::sync::Mutex<()>,
}

impl SessionStore {
    /// Create a new store builder
    pub fn builder(client: ArrosageClient) -> SessionStoreBuilder {
        SessionStoreBuilder {
            client,
            storage: None,
            navigator: None,
            clock: None,
        }
    }

    /// Open a store with the platform's default storage and navigation
    pub async fn open(client: ArrosageClient) -> Arc<Self> {
        Self::builder(client).open().await
    }

    /// The HTTP client the store talks to the auth service with
    pub const fn client(&self) -> &ArrosageClient {
        &self.client
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> AuthPhase {
        self.state().phase
    }

    /// Log in; on success the session is persisted and the user published
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, ClientError> {
        let previous = self.begin_authentication();
        match self.client.login(credentials).await {
            Ok(response) => {
                info!(username = %response.user.username, "Login successful");
                self.establish(response)
                    .inspect_err(|_| self.restore_phase(previous))
            }
            Err(err) => {
                debug!(error = %err, "Login rejected");
                self.restore_phase(previous);
                Err(err)
            }
        }
    }

    /// Register a new account; same contract as `login`
    pub async fn register(&self, details: &RegisterRequest) -> Result<Session, ClientError> {
        let previous = self.begin_authentication();
        match self.client.register(details).await {
            Ok(response) => {
                info!(username = %response.user.username, "Registration successful");
                self.establish(response)
                    .inspect_err(|_| self.restore_phase(previous))
            }
            Err(err) => {
                debug!(error = %err, "Registration rejected");
                self.restore_phase(previous);
                Err(err)
            }
        }
    }

    /// End the session
    ///
    /// The backend is told to revoke the refresh token when there is one, but
    /// its answer does not matter: local state is cleared regardless.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.refresh_token() {
            let access_token = self.access_token();
            if let Err(err) = self
                .client
                .logout(&refresh_token, access_token.as_deref())
                .await
            {
                warn!(error = %err, "Logout notification failed");
            }
        }
        self.clear_session(AuthPhase::LoggedOut, None);
        info!("Logged out");
        self.navigator.navigate(AuthConfig::LOGIN_ROUTE);
    }

    /// Drop the session without contacting the backend
    pub fn invalidate(&self) {
        warn!("Session invalidated");
        self.clear_session(AuthPhase::LoggedOut, None);
        self.navigator.navigate(AuthConfig::LOGIN_ROUTE);
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(AuthConfig::ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(AuthConfig::REFRESH_TOKEN_KEY)
    }

    /// Stored expiry of the access token, in epoch milliseconds
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.read(AuthConfig::TOKEN_EXPIRY_KEY)
            .and_then(|v| v.trim().parse().ok())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).filter(|v| !v.is_empty())
    }

    /// Currently published user, if any
    pub fn current_user(&self) -> Option<UserProfile> {
        self.user.borrow().clone()
    }

    /// Observe user changes; `None` is published on logout
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.user.subscribe()
    }

    /// Snapshot of the full session, when one is stored
    pub fn session(&self) -> Option<Session> {
        match read_persisted(self.storage.as_ref()) {
            Persisted::Complete(session) => Some(session),
            Persisted::Empty | Persisted::Damaged => None,
        }
    }

    /// True when an access token is stored and outside the expiry margin
    pub fn is_authenticated(&self) -> bool {
        if self.access_token().is_none() {
            return false;
        }
        // A token without a known expiry is not trusted
        self.expires_at_ms()
            .is_some_and(|expires_at| !is_expired(expires_at, self.clock.now_ms()))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user
            .borrow()
            .as_ref()
            .is_some_and(|user| roles::has_role(&user.roles, role))
    }

    pub fn has_any_role<W: AsRef<str>>(&self, wanted: &[W]) -> bool {
        self.user
            .borrow()
            .as_ref()
            .is_some_and(|user| roles::has_any_role(&user.roles, wanted))
    }

    /// Token to present, together with the generation it belongs to
    pub fn credentials(&self) -> Credentials {
        let state = self.state();
        Credentials {
            access_token: self.access_token(),
            generation: state.generation,
        }
    }

    /// Replace the stored profile of the current session
    pub fn update_profile(&self, user: UserProfile) -> Result<(), ClientError> {
        let serialized = serde_json::to_string(&user)?;
        {
            let _state = self.state();
            if self.access_token().is_none() {
                return Err(session_expired());
            }
            self.storage.set_item(AuthConfig::USER_KEY, &serialized)?;
        }
        self.user.send_replace(Some(user));
        Ok(())
    }

    /// Exchange the refresh token for a new token pair
    ///
    /// Concurrent callers share one backend round-trip. A rejected renewal
    /// ends the session and every waiter gets the same `SessionExpired`.
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let generation = self.state().generation;
        self.renew_since(generation).await
    }

    /// Renew unless the token record changed after `observed`
    pub async fn renew_since(&self, observed: u64) -> Result<String, ClientError> {
        let _renewal = self.renewal.lock().await;

        if self.state().generation != observed {
            debug!("Session changed while waiting, reusing current token");
            return self.access_token().ok_or_else(session_expired);
        }

        let Some(refresh_token) = self.refresh_token() else {
            warn!("No refresh token available, ending session");
            self.force_logout();
            return Err(session_expired());
        };

        self.set_phase(AuthPhase::Refreshing);
        info!("Renewing access token");

        match self.client.refresh_token(&refresh_token).await {
            Ok(renewed) => {
                let now = self.clock.now_ms();
                let lifetime = self
                    .state()
                    .token_lifetime_ms
                    .unwrap_or(AuthConfig::DEFAULT_TOKEN_LIFETIME_MS);
                let expires_at = jwt_expiry_ms(&renewed.access_token)
                    .unwrap_or_else(|| now.saturating_add(lifetime));

                let written = self.write_record(
                    &[
                        (AuthConfig::ACCESS_TOKEN_KEY, renewed.access_token.clone()),
                        (AuthConfig::REFRESH_TOKEN_KEY, renewed.refresh_token),
                        (AuthConfig::TOKEN_EXPIRY_KEY, expires_at.to_string()),
                    ],
                    None,
                    Some(observed),
                )?;
                if !written {
                    debug!("Session changed during renewal, discarding renewed tokens");
                    return self.access_token().ok_or_else(session_expired);
                }
                info!("Access token renewed");
                Ok(renewed.access_token)
            }
            Err(err) => {
                if !self.clear_session(AuthPhase::LoggedOut, Some(observed)) {
                    debug!(error = %err, "Renewal failed for a session that was already replaced");
                    return self.access_token().ok_or_else(session_expired);
                }
                warn!(error = %err, "Token renewal rejected, ending session");
                self.navigator.navigate(AuthConfig::LOGIN_ROUTE);
                Err(session_expired())
            }
        }
    }

    /// Persist a login/registration response and publish its user
    fn establish(&self, response: AuthResponse) -> Result<Session, ClientError> {
        let expires_at_ms = self.clock.now_ms().saturating_add(response.expires_in);
        let session = Session {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at_ms,
            user: response.user,
        };

        self.write_record(
            &[
                (AuthConfig::ACCESS_TOKEN_KEY, session.access_token.clone()),
                (AuthConfig::REFRESH_TOKEN_KEY, session.refresh_token.clone()),
                (AuthConfig::USER_KEY, serde_json::to_string(&session.user)?),
                (AuthConfig::TOKEN_EXPIRY_KEY, expires_at_ms.to_string()),
            ],
            Some(response.expires_in),
            None,
        )?;
        self.user.send_replace(Some(session.user.clone()));
        Ok(session)
    }

    /// Write session keys as one unit; a failed write leaves no partial record
    ///
    /// With `expected_generation` set, nothing is written and `Ok(false)` is
    /// returned when the record changed since that generation.
    fn write_record(
        &self,
        entries: &[(&str, String)],
        token_lifetime_ms: Option<i64>,
        expected_generation: Option<u64>,
    ) -> Result<bool, ClientError> {
        let mut state = self.state();
        if expected_generation.is_some_and(|expected| expected != state.generation) {
            return Ok(false);
        }
        let written = entries
            .iter()
            .try_for_each(|(key, value)| self.storage.set_item(key, value));

        state.generation += 1;
        match written {
            Ok(()) => {
                state.phase = AuthPhase::Authenticated;
                if token_lifetime_ms.is_some() {
                    state.token_lifetime_ms = token_lifetime_ms;
                }
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "Failed to persist session");
                self.remove_record();
                state.phase = AuthPhase::NoSession;
                state.token_lifetime_ms = None;
                drop(state);
                self.user.send_replace(None);
                Err(err)
            }
        }
    }

    fn remove_record(&self) {
        for key in AuthConfig::SESSION_KEYS {
            self.storage.remove_item(key);
        }
    }

    /// Remove the record; with `expected_generation` set, only if it is
    /// still that generation. Returns whether anything was cleared.
    fn clear_session(&self, phase: AuthPhase, expected_generation: Option<u64>) -> bool {
        {
            let mut state = self.state();
            if expected_generation.is_some_and(|expected| expected != state.generation) {
                return false;
            }
            self.remove_record();
            state.generation += 1;
            state.phase = phase;
            state.token_lifetime_ms = None;
        }
        self.user.send_replace(None);
        true
    }

    fn force_logout(&self) {
        self.clear_session(AuthPhase::LoggedOut, None);
        self.navigator.navigate(AuthConfig::LOGIN_ROUTE);
    }

    fn begin_authentication(&self) -> AuthPhase {
        let mut state = self.state();
        std::mem::replace(&mut state.phase, AuthPhase::Authenticating)
    }

    fn restore_phase(&self, previous: AuthPhase) {
        let mut state = self.state();
        if state.phase == AuthPhase::Authenticating {
            state.phase = previous;
        }
    }

    fn set_phase(&self, phase: AuthPhase) {
        self.state().phase = phase;
    }
}

/// Builder for `SessionStore`
pub struct SessionStoreBuilder {
    client: ArrosageClient,
    storage: Option<Arc<dyn SessionStorage>>,
    navigator: Option<Arc<dyn Navigator>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SessionStoreBuilder {
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Load the persisted session and bring it up to date
    ///
    /// An expired access token triggers one renewal attempt; a damaged record
    /// or a failed renewal ends the session.
    pub async fn open(self) -> Arc<SessionStore> {
        let storage = self.storage.unwrap_or_else(default_storage);
        let persisted = read_persisted(storage.as_ref());

        let (phase, user) = match &persisted {
            Persisted::Complete(session) => (AuthPhase::Authenticated, Some(session.user.clone())),
            Persisted::Empty | Persisted::Damaged => (AuthPhase::NoSession, None),
        };
        let (user, _) = watch::channel(user);

        let store = Arc::new(SessionStore {
            client: self.client,
            storage,
            navigator: self.navigator.unwrap_or_else(default_navigator),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            state: Mutex::new(StoreState {
                phase,
                generation: 0,
                token_lifetime_ms: None,
            }),
            user,
            renewal: tokio::sync::Mutex::new(()),
        });

        match persisted {
            Persisted::Empty => debug!("No stored session"),
            Persisted::Damaged => {
                warn!("Stored session is incomplete, discarding it");
                store.force_logout();
            }
            Persisted::Complete(session) if session.is_expired_at(store.clock.now_ms()) => {
                info!(username = %session.user.username, "Stored access token expired, renewing");
                if let Err(err) = store.refresh().await {
                    debug!(error = %err, "Startup renewal failed");
                }
            }
            Persisted::Complete(session) => {
                debug!(username = %session.user.username, "Restored session");
            }
        }

        store
    }
}

fn read_persisted(storage: &dyn SessionStorage) -> Persisted {
    let read = |key: &str| storage.get_item(key).filter(|v| !v.is_empty());

    match (
        read(AuthConfig::ACCESS_TOKEN_KEY),
        read(AuthConfig::REFRESH_TOKEN_KEY),
    ) {
        (Some(access_token), Some(refresh_token)) => {
            let user = read(AuthConfig::USER_KEY)
                .and_then(|json| serde_json::from_str::<UserProfile>(&json).ok());
            let Some(user) = user else {
                return Persisted::Damaged;
            };
            // Unknown expiry reads as already expired
            let expires_at_ms = read(AuthConfig::TOKEN_EXPIRY_KEY)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            Persisted::Complete(Session {
                access_token,
                refresh_token,
                expires_at_ms,
                user,
            })
        }
        (None, None) => {
            let leftovers = [AuthConfig::USER_KEY, AuthConfig::TOKEN_EXPIRY_KEY]
                .into_iter()
                .any(|key| storage.get_item(key).is_some());
            if leftovers {
                Persisted::Damaged
            } else {
                Persisted::Empty
            }
        }
        _ => Persisted::Damaged,
    }
}
