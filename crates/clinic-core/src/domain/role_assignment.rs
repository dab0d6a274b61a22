//! Role assignment entity (user -> role, clinic)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clinic::TenantId;
use super::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub clinic_id: Option<TenantId>,
    pub created_at: DateTime<Utc>,
}

impl RoleAssignment {
    pub fn new(role: Role, clinic_id: Option<TenantId>, created_at: DateTime<Utc>) -> Self {
        Self { role, clinic_id, created_at }
    }

    /// Authenticated and role-classified, but attached to no clinic.
    pub fn is_orphan(&self) -> bool {
        !self.role.is_super_admin() && self.clinic_id.is_none()
    }

    /// The newest row wins; rows are never merged.
    pub fn latest(rows: impl IntoIterator<Item = RoleAssignment>) -> Option<RoleAssignment> {
        rows.into_iter().max_by_key(|row| row.created_at)
    }
}
