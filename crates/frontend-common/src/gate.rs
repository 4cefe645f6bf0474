//! Request gate: the authenticated request path
//!
//! Attaches the current access token to every non-public request and
//! recovers from a 401 by renewing through the session store and replaying
//! the request once.

use crate::auth::SessionStore;
use arrosage_http::client::auth::is_public_endpoint;
use arrosage_http::{ArrosageClient, ClientError};
use reqwest::header::{self, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error};

/// Client wrapper that handles credentials and token renewal
#[derive(Clone)]
pub struct RequestGate {
    client: ArrosageClient,
    store: Arc<SessionStore>,
}

impl RequestGate {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            client: store.client().clone(),
            store,
        }
    }

    pub const fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Create a request builder; credentials are added on execution
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, path)
    }

    /// Execute a request and decode its JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(request).await?;
        ArrosageClient::decode(response).await.inspect_err(report)
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), ClientError> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        let template = request.build()?;
        self.send_gated(template).await.inspect_err(report)
    }

    async fn send_gated(&self, template: Request) -> Result<Response, ClientError> {
        if is_public_endpoint(template.url().path()) {
            let response = self.client.send(template).await?;
            return ArrosageClient::check(response).await;
        }

        let credentials = self.store.credentials();
        let request = with_bearer(&template, credentials.access_token.as_deref())?;
        let response = self.client.send(request).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return ArrosageClient::check(response).await;
        }

        debug!(url = %template.url(), "Request rejected as unauthenticated, renewing token");
        let token = self.store.renew_since(credentials.generation).await?;

        debug!(url = %template.url(), "Replaying request with renewed token");
        let replay = with_bearer(&template, Some(&token))?;
        let response = self.client.send(replay).await?;
        ArrosageClient::check(response).await
    }
}

/// Copy of `template` carrying `token` as bearer credential
fn with_bearer(template: &Request, token: Option<&str>) -> Result<Request, ClientError> {
    let mut request = template.try_clone().ok_or_else(|| {
        ClientError::Configuration("request body cannot be replayed".into())
    })?;
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::Configuration(format!("invalid access token: {e}")))?;
        request.headers_mut().insert(header::AUTHORIZATION, value);
    }
    Ok(request)
}

fn report(err: &ClientError) {
    let api_error = err.normalized();
    error!(status = api_error.status, "HTTP Error: {}", api_error.message);
}
