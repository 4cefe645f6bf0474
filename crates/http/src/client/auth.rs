//! Authentication API client methods

use super::{ArrosageClient, ClientError};
use crate::types::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, TokenRefreshRequest,
    TokenRefreshResponse,
};
use reqwest::{Method, StatusCode, header};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const REFRESH_TOKEN_PATH: &str = "/api/auth/refresh-token";
pub const VALIDATE_PATH: &str = "/api/auth/validate";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const ME_PATH: &str = "/api/auth/me";

/// Endpoints reachable without a bearer credential
pub const PUBLIC_ENDPOINTS: [&str; 4] = [LOGIN_PATH, REGISTER_PATH, REFRESH_TOKEN_PATH, VALIDATE_PATH];

/// Whether a request path targets one of the public auth endpoints
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|public| path.contains(public))
}

impl ArrosageClient {
    /// Authenticate with username and password
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, LOGIN_PATH).json(credentials);
        self.execute(request).await
    }

    /// Create an account; the backend logs the new user in directly
    pub async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, REGISTER_PATH).json(details);
        self.execute(request).await
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, ClientError> {
        let request = self
            .request(Method::POST, REFRESH_TOKEN_PATH)
            .json(&TokenRefreshRequest {
                refresh_token: refresh_token.to_string(),
            });
        self.execute(request).await
    }

    /// Revoke a refresh token server-side
    pub async fn logout(
        &self,
        refresh_token: &str,
        access_token: Option<&str>,
    ) -> Result<MessageResponse, ClientError> {
        let mut request = self
            .request(Method::POST, LOGOUT_PATH)
            .json(&TokenRefreshRequest {
                refresh_token: refresh_token.to_string(),
            });
        if let Some(token) = access_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.execute(request).await
    }

    /// Ask the backend whether an access token is still valid
    pub async fn validate_token(&self, token: &str) -> Result<bool, ClientError> {
        let request = self
            .request(Method::GET, VALIDATE_PATH)
            .query(&[("token", token)]);
        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            _ => Self::check(response).await.map(|_| false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoints() {
        assert!(is_public_endpoint("/api/auth/login"));
        assert!(is_public_endpoint("/gateway/api/auth/refresh-token"));
        assert!(is_public_endpoint("/api/auth/validate"));
        assert!(!is_public_endpoint("/api/auth/logout"));
        assert!(!is_public_endpoint("/api/auth/me"));
        assert!(!is_public_endpoint("/api/arrosage/parcelles"));
    }
}
