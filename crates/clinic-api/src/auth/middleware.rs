// ============================================================================
// Clinic API - Auth Middleware
// File: crates/clinic-api/src/auth/middleware.rs
// ============================================================================

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use clinic_core::domain::Identity;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// `None` when no bearer token was sent; an invalid token is an error.
pub(crate) fn optional_identity(state: &AppState, headers: &HeaderMap) -> Result<Option<Identity>, ApiError> {
    match bearer_token(headers) {
        Some(token) => Ok(Some(state.jwt.validate_token(token)?.into())),
        None => Ok(None),
    }
}

pub(crate) fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    optional_identity(state, headers)?
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))
}

/// Guards `/api/v1/clinic-users/*`: verifies the bearer token, re-derives
/// the caller's role server-side and hands a `ClinicAdminContext` to the
/// handlers through request extensions.
pub async fn require_clinic_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = require_identity(&state, req.headers())?;
    let context = state.gate.authorize(&identity.user_id).await?;

    debug!(
        "Clinic admin {} admitted for clinic {}",
        context.user_id, context.clinic_id
    );
    req.extensions_mut().insert(identity);
    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
