//! Route definitions for the Slab Marketplace Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - batch inventory
        .nest("/batches", batch_routes())
        // Protected routes - reservation lifecycle
        .nest("/reservations", reservation_routes())
        // Protected routes - sale ledger
        .nest("/sales", sale_routes())
        // Protected routes - leads
        .nest("/leads", lead_routes())
        // Protected routes - industry profile
        .nest("/industries", industry_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Batch inventory routes (protected)
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_batches).post(handlers::create_batch))
        .route(
            "/:batch_id",
            get(handlers::get_batch)
                .put(handlers::update_batch)
                .delete(handlers::archive_batch),
        )
        .route("/:batch_id/price", get(handlers::get_batch_price))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reservation lifecycle routes (protected)
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_active_reservations).post(handlers::create_reservation),
        )
        .route("/expire", post(handlers::expire_reservations))
        .route("/:reservation_id", get(handlers::get_reservation))
        .route("/:reservation_id/sale", get(handlers::get_reservation_sale))
        .route("/:reservation_id/cancel", post(handlers::cancel_reservation))
        .route(
            "/:reservation_id/confirm-sale",
            post(handlers::confirm_sale),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale ledger routes (protected, read-only)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales))
        .route("/:sale_id", get(handlers::get_sale))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Lead routes (protected)
fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_leads).post(handlers::create_lead))
        .route("/:lead_id", get(handlers::get_lead))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Industry profile routes (protected)
fn industry_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::get_my_industry))
        .route_layer(middleware::from_fn(auth_middleware))
}
