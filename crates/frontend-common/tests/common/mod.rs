//! Shared fixtures for the session and gate tests

#![allow(dead_code)]

use arrosage_frontend_common::auth::{
    ManualClock, MemoryNavigator, MemoryStorage, SessionStorage, SessionStore,
};
use arrosage_frontend_common::config::AuthConfig;
use arrosage_http::ArrosageClient;
use arrosage_http::types::LoginRequest;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fixed "now" for every test, 2023-11-14T22:13:20Z
pub const NOW_MS: i64 = 1_700_000_000_000;

pub const HOUR_MS: i64 = 3_600_000;

pub fn user_json(roles: &[&str]) -> Value {
    json!({
        "id": 7,
        "username": "amina",
        "email": "amina@ferme.local",
        "firstName": "Amina",
        "roles": roles,
        "enabled": true
    })
}

pub fn auth_body(access: &str, refresh: &str, expires_in: i64, roles: &[&str]) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "expiresIn": expires_in,
        "user": user_json(roles)
    })
}

pub fn refresh_body(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer"
    })
}

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<MemoryNavigator>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<SessionStore>,
}

impl Harness {
    /// Fresh server and empty storage
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self::open(server, Arc::new(MemoryStorage::new())).await
    }

    /// Open a store over existing storage
    pub async fn open(server: MockServer, storage: Arc<MemoryStorage>) -> Self {
        let navigator = Arc::new(MemoryNavigator::new());
        let clock = Arc::new(ManualClock::new(NOW_MS));
        let client = ArrosageClient::new(server.uri()).unwrap();
        let store = SessionStore::builder(client)
            .storage(storage.clone())
            .navigator(navigator.clone())
            .clock(clock.clone())
            .open()
            .await;
        Self {
            server,
            storage,
            navigator,
            clock,
            store,
        }
    }

    /// Log in as `amina` with the given access/refresh tokens
    pub async fn login(&self, access: &str, refresh: &str, roles: &[&str]) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(auth_body(access, refresh, HOUR_MS, roles)),
            )
            .up_to_n_times(1)
            .mount(&self.server)
            .await;

        self.store
            .login(&LoginRequest::new("amina", "secret"))
            .await
            .unwrap();
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get_item(key)
    }
}

/// Storage pre-filled with a complete session record
pub fn persisted_session(access: &str, refresh: &str, expires_at_ms: i64) -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(AuthConfig::ACCESS_TOKEN_KEY, access).unwrap();
    storage.set_item(AuthConfig::REFRESH_TOKEN_KEY, refresh).unwrap();
    storage
        .set_item(AuthConfig::USER_KEY, &user_json(&["ROLE_FARMER"]).to_string())
        .unwrap();
    storage
        .set_item(AuthConfig::TOKEN_EXPIRY_KEY, &expires_at_ms.to_string())
        .unwrap();
    storage
}
