//! Client error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NETWORK_UNREACHABLE_MESSAGE: &str =
    "Unable to connect to server. Please check your network connection.";

/// Client error types
///
/// The HTTP kinds mirror the status codes the backend answers with; the
/// remaining kinds are raised locally by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached (status 0)
    #[error("Unable to connect to server: {0}")]
    NetworkUnreachable(String),

    /// Bad request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Authentication required or rejected (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// Forbidden (403)
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Conflict with existing state (409)
    #[error("{0}")]
    Conflict(String),

    /// Server returned a 5xx status
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("{message}")]
    Unknown { status: u16, message: String },

    /// Token renewal failed; the session has been discarded
    #[error("{0}")]
    SessionExpired(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Client-side session storage failed
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Normalised error value handed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract the backend's `message` field from an error body, if any
fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// `Error: 502 Bad Gateway`, or just the code when it has no reason phrase
fn status_line(status: reqwest::StatusCode) -> String {
    format!(
        "Error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string()
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = backend_message(body);
        let code = status.as_u16();
        match code {
            400 => Self::BadRequest(message.unwrap_or_else(|| "Bad request".into())),
            401 => Self::Unauthenticated("Unauthorized. Please login again.".into()),
            403 => Self::Forbidden(
                "Access denied. You do not have permission to perform this action.".into(),
            ),
            404 => Self::NotFound("Resource not found".into()),
            409 => {
                Self::Conflict(message.unwrap_or_else(|| "Conflict - resource already exists".into()))
            }
            500 => Self::ServerError {
                status: code,
                message: "Internal server error. Please try again later.".into(),
            },
            503 => Self::ServerError {
                status: code,
                message: "Service unavailable. Please try again later.".into(),
            },
            500..=599 => Self::ServerError {
                status: code,
                message: message.unwrap_or_else(|| status_line(status)),
            },
            _ => Self::Unknown {
                status: code,
                message: message.unwrap_or_else(|| status_line(status)),
            },
        }
    }

    /// HTTP status associated with this error; 0 for local failures
    pub const fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthenticated(_) | Self::SessionExpired(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::ServerError { status, .. } | Self::Unknown { status, .. } => *status,
            Self::NetworkUnreachable(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Storage(_) => 0,
        }
    }

    /// Whether the user has to authenticate again
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::SessionExpired(_))
    }

    /// Collapse into the `{status, message}` value shown by the UI
    pub fn normalized(&self) -> ApiError {
        let message = match self {
            Self::NetworkUnreachable(_) => NETWORK_UNREACHABLE_MESSAGE.to_string(),
            other => other.to_string(),
        };
        ApiError {
            status: self.status(),
            message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::NetworkUnreachable(err.to_string())
        }
    }
}

impl From<&ClientError> for ApiError {
    fn from(err: &ClientError) -> Self {
        err.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_bad_request_prefers_backend_message() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"superficie must be positive"}"#,
        );
        assert!(matches!(err, ClientError::BadRequest(ref m) if m == "superficie must be positive"));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_bad_request_without_body() {
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, "");
        assert_eq!(err.normalized().message, "Bad request");
    }

    #[test]
    fn test_conflict_default_message() {
        let err = ClientError::from_status(StatusCode::CONFLICT, "not json");
        assert_eq!(
            err.normalized(),
            ApiError {
                status: 409,
                message: "Conflict - resource already exists".into()
            }
        );
    }

    #[test]
    fn test_fixed_messages_ignore_backend_text() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, r#"{"message":"nope"}"#);
        assert_eq!(err.to_string(), "Resource not found");

        let err = ClientError::from_status(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, ClientError::Forbidden(_)));
    }

    #[test]
    fn test_server_errors() {
        let err = ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.status(), 503);
        assert_eq!(err.to_string(), "Service unavailable. Please try again later.");

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ClientError::ServerError { status: 502, .. }));
        assert_eq!(err.to_string(), "Error: 502 Bad Gateway");

        let err = ClientError::from_status(StatusCode::GATEWAY_TIMEOUT, r#"{"message":"upstream slow"}"#);
        assert_eq!(err.normalized().message, "upstream slow");
    }

    #[test]
    fn test_unknown_status() {
        let err = ClientError::from_status(StatusCode::IM_A_TEAPOT, "");
        assert!(matches!(err, ClientError::Unknown { status: 418, .. }));
        assert_eq!(err.to_string(), "Error: 418 I'm a teapot");
    }

    #[test]
    fn test_auth_expired_kinds() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_auth_expired());
        assert!(ClientError::SessionExpired("gone".into()).is_auth_expired());
        assert!(!ClientError::NotFound("x".into()).is_auth_expired());
    }

    #[test]
    fn test_network_unreachable_normalizes_to_status_zero() {
        let err = ClientError::NetworkUnreachable("connection refused".into());
        let api = err.normalized();
        assert_eq!(api.status, 0);
        assert_eq!(api.message, NETWORK_UNREACHABLE_MESSAGE);
    }
}
