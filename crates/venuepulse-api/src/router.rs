//! Route definitions for the VenuePulse HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// The admission gate wraps everything, including health checks: a health
/// probe that cannot get a permit is itself a useful overload signal.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(reservation_routes())
        .merge(space_routes())
        .merge(checkin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admission::admission_gate,
        ))
        .with_state(state)
}

/// Reservation endpoints
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            post(handlers::reservation::create_reservation),
        )
        .route(
            "/reservations/active",
            get(handlers::reservation::active_reservation),
        )
        .route(
            "/reservations/{id}",
            delete(handlers::reservation::cancel_reservation),
        )
}

/// Space listing, admin management, and congestion reads
fn space_routes() -> Router<AppState> {
    Router::new()
        .route("/spaces", get(handlers::space::list_spaces))
        .route("/spaces", post(handlers::space::create_space))
        .route("/spaces/{id}", get(handlers::space::get_space))
        .route(
            "/spaces/{id}/status",
            put(handlers::space::set_space_status),
        )
        .route(
            "/spaces/{id}/congestion",
            get(handlers::congestion::get_congestion),
        )
        .route(
            "/spaces/{id}/reservations",
            get(handlers::reservation::list_space_reservations),
        )
}

/// Check-in and check-out endpoints
fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/checkin", post(handlers::checkin::check_in))
        .route("/checkout", post(handlers::checkin::check_out))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors.max_age(std::time::Duration::from_secs(
        cors_config.max_age_seconds,
    ))
}
