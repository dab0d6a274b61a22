// ============================================================================
// Clinic API - Router
// File: crates/clinic-api/src/router.rs
// ============================================================================

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::auth::require_clinic_admin;
use crate::handlers::{clinic_users, health, session};
use crate::state::AppState;

pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Invalid allowed origin {:?}, CORS disabled: {}", allowed_origin, e);
            layer
        }
    }
}

pub fn build_router(state: AppState, allowed_origin: &str) -> Router {
    let clinic_users = Router::new()
        .route("/context", get(clinic_users::context))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_clinic_admin));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Session resolution
        .route("/api/v1/session/resolution", get(session::resolution))
        .route("/api/v1/session/active-clinic", put(session::set_active_clinic))
        .route("/api/v1/session/active-clinic/name", put(session::rename_active_clinic))
        .route("/api/v1/session/welcome", post(session::arm_welcome))
        // Clinic user management
        .nest("/api/v1/clinic-users", clinic_users)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origin))
}
