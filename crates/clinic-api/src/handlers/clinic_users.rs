//! Clinic user management handlers (behind `require_clinic_admin`)

use axum::{Extension, Json};

use clinic_core::services::ClinicAdminContext;

use crate::response::ApiResponse;

/// GET /api/v1/clinic-users/context
pub async fn context(
    Extension(context): Extension<ClinicAdminContext>,
) -> Json<ApiResponse<ClinicAdminContext>> {
    Json(ApiResponse::success(context))
}
