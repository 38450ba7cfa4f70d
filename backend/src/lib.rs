//! Slab Marketplace Platform - Backend
//!
//! Multi-tenant marketplace for stone slab batches: industries publish
//! inventory, brokers reserve it and confirm sales. The reservation
//! lifecycle is the consistency core; every batch status change goes
//! through a locked transaction.

use axum::{routing::get, Router};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod stores;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Spawn the periodic reservation expiration sweep
pub fn spawn_expiration_sweeper(state: &AppState) {
    let service = services::ReservationService::new(
        state.db.clone(),
        state.config.sweeper.default_ttl_days,
    );
    let interval_secs = state.config.sweeper.interval_secs;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            match service.expire_reservations().await {
                Ok(sweep) if sweep.candidates > 0 => {
                    tracing::info!(
                        expired = sweep.expired,
                        candidates = sweep.candidates,
                        "Expiration sweep completed"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Expiration sweep failed");
                }
            }
        }
    });
}

/// Root endpoint
async fn root() -> &'static str {
    "Slab Marketplace Platform API v1.0"
}
