//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{CredentialService, PrincipalResolver};
use crate::market::MarketDataService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<CredentialService>,
    pub principal_resolver: Arc<PrincipalResolver>,
    pub market_service: Arc<MarketDataService>,
}

impl AppState {
    pub fn new(
        credential_service: Arc<CredentialService>,
        principal_resolver: Arc<PrincipalResolver>,
        market_service: Arc<MarketDataService>,
    ) -> Self {
        Self {
            credential_service,
            principal_resolver,
            market_service,
        }
    }
}

impl FromRef<AppState> for Arc<CredentialService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credential_service.clone()
    }
}

impl FromRef<AppState> for Arc<PrincipalResolver> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.principal_resolver.clone()
    }
}

impl FromRef<AppState> for Arc<MarketDataService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.market_service.clone()
    }
}
