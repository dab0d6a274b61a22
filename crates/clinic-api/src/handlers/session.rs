// ============================================================================
// Clinic API - Session Resolution Handlers
// File: crates/clinic-api/src/handlers/session.rs
// ============================================================================
//! Resolves role, tenant and route decision for the calling session.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use clinic_core::domain::{Capability, Identity, TenantId};
use clinic_core::services::{ClinicContext, ResolutionState, RouteDecision, WelcomeNotice};
use clinic_shared::constants::DEFAULT_HOME_PATH;

use crate::auth::middleware::{optional_identity, require_identity};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolutionQuery {
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    DEFAULT_HOME_PATH.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ActiveClinicRequest {
    pub clinic_id: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ClinicNameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ResolutionResponse {
    pub state: ResolutionState,
    pub decision: RouteDecision,
    pub capabilities: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome: Option<String>,
}

fn respond(
    state: &AppState,
    ctx: &ClinicContext,
    identity: Option<&Identity>,
    location: &str,
) -> ResolutionResponse {
    let decision = ctx.decide_route(location);
    let snapshot = ctx.snapshot();

    let welcome = match (identity, &decision) {
        (Some(identity), RouteDecision::Render) => {
            WelcomeNotice::new(state.session_storage_for(identity)).on_authorized(Some(identity))
        }
        _ => None,
    };
    let capabilities = snapshot
        .role
        .map(|role| role.capabilities().to_vec())
        .unwrap_or_default();

    ResolutionResponse {
        state: snapshot,
        decision,
        capabilities,
        welcome,
    }
}

/// GET /api/v1/session/resolution?location=/patients
pub async fn resolution(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ResolutionQuery>,
) -> Result<Json<ApiResponse<ResolutionResponse>>, ApiError> {
    let identity = optional_identity(&state, &headers)?;
    let ctx = state.clinic_context(identity.clone());
    ctx.refresh().await;

    Ok(Json(ApiResponse::success(respond(
        &state,
        &ctx,
        identity.as_ref(),
        &query.location,
    ))))
}

/// PUT /api/v1/session/active-clinic
pub async fn set_active_clinic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ActiveClinicRequest>,
) -> Result<Json<ApiResponse<ResolutionResponse>>, ApiError> {
    let identity = require_identity(&state, &headers)?;
    let clinic_id = payload
        .clinic_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(TenantId::new);

    let ctx = state.clinic_context(Some(identity.clone()));
    ctx.refresh().await;
    if !ctx.set_active_clinic_id(clinic_id.clone()) {
        return Err(ApiError::Forbidden(
            "only super_admin can switch the active clinic".to_string(),
        ));
    }
    ctx.load_active_clinic(None).await;

    info!(
        "User {} switched active clinic to {}",
        identity.user_id,
        clinic_id.as_ref().map_or("none", TenantId::as_str)
    );
    Ok(Json(ApiResponse::success(respond(
        &state,
        &ctx,
        Some(&identity),
        &payload.location,
    ))))
}

/// PUT /api/v1/session/active-clinic/name
pub async fn rename_active_clinic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ClinicNameRequest>,
) -> Result<Json<ApiResponse<ResolutionState>>, ApiError> {
    let identity = require_identity(&state, &headers)?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let ctx = state.clinic_context(Some(identity));
    ctx.refresh().await;
    ctx.set_active_clinic_name(&payload.name);
    Ok(Json(ApiResponse::success(ctx.snapshot())))
}

/// POST /api/v1/session/welcome, called by the login flow after sign-in.
pub async fn arm_welcome(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let identity = require_identity(&state, &headers)?;
    WelcomeNotice::arm(state.session_storage_for(&identity).as_ref());
    Ok(StatusCode::NO_CONTENT)
}
