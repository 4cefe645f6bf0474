//! Authentication API service

use crate::auth::{Session, SessionStore};
use crate::gate::RequestGate;
use arrosage_http::ClientError;
use arrosage_http::client::auth::ME_PATH;
use arrosage_http::types::{LoginRequest, RegisterRequest, UserProfile};
use reqwest::Method;
use std::sync::Arc;

/// Authentication API service
#[derive(Clone)]
pub struct AuthService {
    gate: RequestGate,
}

impl AuthService {
    pub const fn new(gate: RequestGate) -> Self {
        Self { gate }
    }

    fn store(&self) -> &Arc<SessionStore> {
        self.gate.store()
    }

    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session, ClientError> {
        self.store()
            .login(&LoginRequest::new(username, password))
            .await
    }

    pub async fn register(&self, details: &RegisterRequest) -> Result<Session, ClientError> {
        self.store().register(details).await
    }

    pub async fn logout(&self) {
        self.store().logout().await;
    }

    /// Reload the current user's profile from the auth service
    pub async fn fetch_profile(&self) -> Result<UserProfile, ClientError> {
        let profile: UserProfile = self
            .gate
            .execute(self.gate.request(Method::GET, ME_PATH))
            .await?;
        self.store().update_profile(profile.clone())?;
        Ok(profile)
    }
}
