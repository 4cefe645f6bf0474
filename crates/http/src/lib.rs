//! Arrosage HTTP module providing the API client and wire types
//!
//! The client speaks to the auth service (`/api/auth/*`) and to the
//! irrigation service (`/api/arrosage/*`).

pub mod client;
pub mod types;

pub use client::error::{ApiError, ClientError};
pub use client::{ArrosageClient, ArrosageClientBuilder};
