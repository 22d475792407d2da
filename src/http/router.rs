//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Booking admission and lifecycle
        .route("/providers/{provider_id}/bookings", post(handlers::book_slot))
        .route(
            "/providers/{provider_id}/bookings/{booking_id}/transition",
            post(handlers::transition_booking),
        )
        // Calendar views
        .route(
            "/providers/{provider_id}/calendar/{year}/{month}",
            get(handlers::month_calendar),
        )
        .route("/providers/{provider_id}/days/{date}", get(handlers::day_detail))
        // Availability management
        .route("/providers/{provider_id}/windows", get(handlers::list_windows))
        .route("/providers/{provider_id}/windows", put(handlers::upsert_window))
        .route(
            "/providers/{provider_id}/windows/{window_id}",
            delete(handlers::delete_window),
        )
        .route("/providers/{provider_id}/holidays", put(handlers::replace_holidays));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
