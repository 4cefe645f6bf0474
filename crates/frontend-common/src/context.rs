//! Application context
//!
//! Wires the session store, request gate and services together so a UI
//! layer can hold one value and clone it freely.

use crate::auth::SessionStore;
use crate::config::FrontendConfig;
use crate::gate::RequestGate;
use crate::services::{
    AuthService, DashboardService, JournalService, ParcelleService, ProgrammeService,
};
use arrosage_http::ClientError;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<SessionStore>,
    pub gate: RequestGate,
    pub auth: AuthService,
    pub parcelles: ParcelleService,
    pub programmes: ProgrammeService,
    pub journaux: JournalService,
    pub dashboard: DashboardService,
}

impl AppContext {
    /// Build the client from `config` and restore any persisted session
    pub async fn init(config: &FrontendConfig) -> Result<Self, ClientError> {
        let client = config.client()?;
        info!(api = %client.base_url(), "Initializing application context");
        let store = SessionStore::open(client).await;
        Ok(Self::with_store(store))
    }

    /// Context around an already opened store
    pub fn with_store(store: Arc<SessionStore>) -> Self {
        let gate = RequestGate::new(store.clone());
        Self {
            auth: AuthService::new(gate.clone()),
            parcelles: ParcelleService::new(gate.clone()),
            programmes: ProgrammeService::new(gate.clone()),
            journaux: JournalService::new(gate.clone()),
            dashboard: DashboardService::new(gate.clone()),
            gate,
            store,
        }
    }
}
