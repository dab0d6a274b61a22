// ============================================================================
// Clinic Core - User Management Gate
// File: crates/clinic-core/src/services/user_gate.rs
// ============================================================================
//! Server-side precondition for the clinic-users function.
//!
//! The caller's role is re-derived from the role table on every call; a role
//! asserted by the client is never consulted.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Capability, Role, RoleAssignment, TenantId};
use crate::error::GateError;
use crate::repositories::RoleRepository;

/// Proof that the caller may manage users of `clinic_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicAdminContext {
    pub user_id: String,
    pub role: Role,
    pub clinic_id: TenantId,
}

pub struct UserManagementGate {
    roles: Arc<dyn RoleRepository>,
}

impl UserManagementGate {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    pub async fn authorize(&self, user_id: &str) -> Result<ClinicAdminContext, GateError> {
        if user_id.trim().is_empty() {
            return Err(GateError::Unauthenticated);
        }

        let rows = self.roles.find_latest_assignments(user_id).await?;
        let assignment = RoleAssignment::latest(rows).ok_or_else(|| {
            warn!("User management denied: user {} has no role", user_id);
            GateError::Forbidden("no role assigned".to_string())
        })?;

        if !assignment.role.can(Capability::ManageClinicUsers) {
            warn!(
                "User management denied: user {} has role {}",
                user_id,
                assignment.role.as_str()
            );
            return Err(GateError::Forbidden(format!(
                "role '{}' cannot manage clinic users",
                assignment.role.as_str()
            )));
        }

        let clinic_id = assignment.clinic_id.ok_or_else(|| {
            warn!("User management denied: admin {} has no clinic", user_id);
            GateError::MissingClinic
        })?;

        info!("User management authorized for {} on clinic {}", user_id, clinic_id);
        Ok(ClinicAdminContext {
            user_id: user_id.to_string(),
            role: assignment.role,
            clinic_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::repositories::MockRoleRepository;
    use chrono::{Duration, Utc};

    fn gate_with(rows: Vec<RoleAssignment>) -> UserManagementGate {
        let mut repo = MockRoleRepository::new();
        repo.expect_find_latest_assignments()
            .returning(move |_| Ok(rows.clone()));
        UserManagementGate::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_admin_with_clinic_is_authorized() {
        let gate = gate_with(vec![RoleAssignment::new(
            Role::Admin,
            Some(TenantId::new("c1")),
            Utc::now(),
        )]);

        let ctx = gate.authorize("u1").await.unwrap();
        assert_eq!(ctx.clinic_id, TenantId::new("c1"));
        assert_eq!(ctx.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_newest_row_decides() {
        let now = Utc::now();
        let gate = gate_with(vec![
            RoleAssignment::new(Role::Admin, Some(TenantId::new("c1")), now - Duration::days(10)),
            RoleAssignment::new(Role::Dentist, Some(TenantId::new("c1")), now),
        ]);

        assert!(matches!(gate.authorize("u1").await, Err(GateError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_super_admin_is_not_a_clinic_admin() {
        let gate = gate_with(vec![RoleAssignment::new(Role::SuperAdmin, None, Utc::now())]);
        assert!(matches!(gate.authorize("u1").await, Err(GateError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_orphan_admin_is_rejected() {
        let gate = gate_with(vec![RoleAssignment::new(Role::Admin, None, Utc::now())]);
        assert!(matches!(gate.authorize("u1").await, Err(GateError::MissingClinic)));
    }

    #[tokio::test]
    async fn test_no_role_and_blank_user() {
        let gate = gate_with(Vec::new());
        assert!(matches!(gate.authorize("u1").await, Err(GateError::Forbidden(_))));
        assert!(matches!(gate.authorize("  ").await, Err(GateError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut repo = MockRoleRepository::new();
        repo.expect_find_latest_assignments()
            .returning(|_| Err(QueryError::permission_denied("permission denied")));
        let gate = UserManagementGate::new(Arc::new(repo));

        assert!(matches!(gate.authorize("u1").await, Err(GateError::Lookup(_))));
    }
}
