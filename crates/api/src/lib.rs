//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for balances, transfers and full settlements
//! - Request/response types with amounts as decimal strings

pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tripsplit_core::settlement::{SettlementPolicy, SettlementService};
use tripsplit_shared::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Settlement service with the configured validation policy.
    pub settlement: SettlementService,
}

impl AppState {
    /// Builds state from configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let settlement = SettlementService::new(SettlementPolicy::from_strict(
            config.settlement.strict_validation,
        ));
        Self { config, settlement }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
