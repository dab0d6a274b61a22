// ============================================================================
// Clinic Core - Route Guard
// File: crates/clinic-core/src/services/guard.rs
// Description: Pure routing state machine over the resolution snapshot
// ============================================================================
//! Every protected screen is gated by [`decide_route`]. Deep links into the
//! protected area go through the same evaluation, so the pending-approval and
//! clinic-disabled destinations are only reached via these redirects.

use clinic_shared::constants::{CLINIC_DISABLED_PATH, LOGIN_PATH, PENDING_APPROVAL_PATH};
use serde::{Deserialize, Serialize};

use crate::domain::{Role, TenantId};

/// Everything the guard looks at, captured in one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardInput {
    pub is_authenticated: bool,
    pub auth_loading: bool,
    pub role: Option<Role>,
    pub clinic_id: Option<TenantId>,
    pub tenant_loading: bool,
    pub has_loaded_role: bool,
    pub error: Option<String>,
    pub is_clinic_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    Loading,
    Unauthenticated,
    RoleError { message: String },
    PendingApproval,
    Authorized,
}

/// Authenticated with a tenant-scoped role but attached to no clinic.
pub fn is_orphan(role: Option<Role>, clinic_id: Option<&TenantId>) -> bool {
    matches!(role, Some(r) if !r.is_super_admin()) && clinic_id.is_none()
}

/// Transition function. Loading is checked first so a session that is still
/// resolving never flashes the login or pending-approval redirects.
pub fn evaluate(input: &GuardInput, location: &str) -> GuardState {
    if input.auth_loading
        || (input.is_authenticated && (input.tenant_loading || !input.has_loaded_role))
    {
        return GuardState::Loading;
    }

    if !input.is_authenticated {
        return GuardState::Unauthenticated;
    }

    if let Some(message) = &input.error {
        return GuardState::RoleError {
            message: message.clone(),
        };
    }

    let orphan = is_orphan(input.role, input.clinic_id.as_ref());
    if (input.role.is_none() || orphan) && !is_location(location, PENDING_APPROVAL_PATH) {
        return GuardState::PendingApproval;
    }

    GuardState::Authorized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicAccess {
    Open,
    Disabled,
}

/// super_admin keeps access to paused clinics so they can be inspected.
pub fn clinic_access(role: Option<Role>, is_clinic_paused: bool) -> ClinicAccess {
    match role {
        Some(Role::SuperAdmin) => ClinicAccess::Open,
        _ if is_clinic_paused => ClinicAccess::Disabled,
        _ => ClinicAccess::Open,
    }
}

/// What the UI shell should do for the requested location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    ShowLoading,
    /// `return_to` is the originally requested location, for post-login return.
    Redirect { to: String, return_to: Option<String> },
    /// Dead end until the user reloads or signs out.
    ShowRoleError { message: String },
    Render,
}

impl RouteDecision {
    fn redirect(to: &str) -> Self {
        RouteDecision::Redirect {
            to: to.to_string(),
            return_to: None,
        }
    }
}

pub fn decide_route(input: &GuardInput, location: &str) -> RouteDecision {
    match evaluate(input, location) {
        GuardState::Loading => RouteDecision::ShowLoading,
        GuardState::Unauthenticated => RouteDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            return_to: Some(location.to_string()),
        },
        GuardState::RoleError { message } => RouteDecision::ShowRoleError { message },
        GuardState::PendingApproval => RouteDecision::redirect(PENDING_APPROVAL_PATH),
        GuardState::Authorized => match clinic_access(input.role, input.is_clinic_paused) {
            ClinicAccess::Disabled if !is_location(location, CLINIC_DISABLED_PATH) => {
                RouteDecision::redirect(CLINIC_DISABLED_PATH)
            }
            _ => RouteDecision::Render,
        },
    }
}

fn is_location(location: &str, path: &str) -> bool {
    let location = location.split(['?', '#']).next().unwrap_or(location);
    location.trim_end_matches('/') == path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorized(role: Role, clinic: Option<&str>) -> GuardInput {
        GuardInput {
            is_authenticated: true,
            auth_loading: false,
            role: Some(role),
            clinic_id: clinic.map(TenantId::from),
            tenant_loading: false,
            has_loaded_role: true,
            error: None,
            is_clinic_paused: false,
        }
    }

    #[test]
    fn test_auth_loading_wins_over_everything() {
        let input = GuardInput {
            auth_loading: true,
            error: Some("boom".to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate(&input, "/patients"), GuardState::Loading);
    }

    #[test]
    fn test_authenticated_but_unresolved_is_loading() {
        let mut input = authorized(Role::Dentist, None);
        input.has_loaded_role = false;
        input.role = None;
        assert_eq!(evaluate(&input, "/patients"), GuardState::Loading);

        let mut input = authorized(Role::Dentist, Some("c1"));
        input.tenant_loading = true;
        assert_eq!(evaluate(&input, "/patients"), GuardState::Loading);
    }

    #[test]
    fn test_signed_out_redirects_to_login_with_return_location() {
        let input = GuardInput::default();
        assert_eq!(evaluate(&input, "/invoices/42"), GuardState::Unauthenticated);
        assert_eq!(
            decide_route(&input, "/invoices/42"),
            RouteDecision::Redirect {
                to: LOGIN_PATH.to_string(),
                return_to: Some("/invoices/42".to_string()),
            }
        );
    }

    #[test]
    fn test_role_error_is_terminal() {
        let mut input = authorized(Role::Admin, Some("c1"));
        input.role = None;
        input.error = Some("permission denied".to_string());
        assert_eq!(
            evaluate(&input, "/dashboard"),
            GuardState::RoleError {
                message: "permission denied".to_string()
            }
        );
    }

    #[test]
    fn test_orphan_and_roleless_go_to_pending_approval() {
        let orphan = authorized(Role::Dentist, None);
        assert!(is_orphan(orphan.role, orphan.clinic_id.as_ref()));
        assert_eq!(evaluate(&orphan, "/dashboard"), GuardState::PendingApproval);

        let mut roleless = authorized(Role::Dentist, None);
        roleless.role = None;
        assert_eq!(evaluate(&roleless, "/dashboard"), GuardState::PendingApproval);
    }

    #[test]
    fn test_no_redirect_loop_on_pending_page() {
        let orphan = authorized(Role::Receptionist, None);
        assert_eq!(evaluate(&orphan, PENDING_APPROVAL_PATH), GuardState::Authorized);
        assert_eq!(evaluate(&orphan, "/pending-approval/?from=login"), GuardState::Authorized);
    }

    #[test]
    fn test_super_admin_without_clinic_is_authorized() {
        let input = authorized(Role::SuperAdmin, None);
        assert!(!is_orphan(input.role, None));
        assert_eq!(evaluate(&input, "/admin/clinics"), GuardState::Authorized);
    }

    #[test]
    fn test_paused_clinic_redirects_non_super_admin() {
        let mut input = authorized(Role::Receptionist, Some("c1"));
        input.is_clinic_paused = true;
        assert_eq!(
            decide_route(&input, "/patients"),
            RouteDecision::Redirect {
                to: CLINIC_DISABLED_PATH.to_string(),
                return_to: None,
            }
        );
        assert_eq!(decide_route(&input, CLINIC_DISABLED_PATH), RouteDecision::Render);

        let mut admin = authorized(Role::SuperAdmin, Some("c1"));
        admin.is_clinic_paused = true;
        assert_eq!(decide_route(&admin, "/patients"), RouteDecision::Render);
    }

    #[test]
    fn test_receptionist_with_clinic_renders() {
        let input = authorized(Role::Receptionist, Some("c1"));
        assert_eq!(evaluate(&input, "/appointments"), GuardState::Authorized);
        assert_eq!(decide_route(&input, "/appointments"), RouteDecision::Render);
    }
}
