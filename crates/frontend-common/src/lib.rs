//! Client-side session handling and API services for the irrigation platform

pub mod auth;
pub mod config;
pub mod context;
pub mod gate;
pub mod logging;
pub mod services;

pub use arrosage_http::{ApiError, ClientError};
pub use auth::{AuthPhase, Session, SessionStore};
pub use config::{AuthConfig, FrontendConfig};
pub use context::AppContext;
pub use gate::RequestGate;
pub use logging::init_logging;
