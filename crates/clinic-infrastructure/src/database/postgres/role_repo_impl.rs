// ============================================================================
// Clinic Infrastructure - PostgreSQL Role Repository
// File: crates/clinic-infrastructure/src/database/postgres/role_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error};

use clinic_core::domain::{Role, RoleAssignment, TenantId};
use clinic_core::error::QueryError;
use clinic_core::repositories::RoleRepository;

use super::error::classify;

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRoleRow {
    pub role: String,
    pub clinic_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRoleRow> for RoleAssignment {
    type Error = QueryError;

    fn try_from(row: UserRoleRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .ok_or_else(|| QueryError::other(format!("unrecognized role '{}'", row.role)))?;
        Ok(RoleAssignment {
            role,
            clinic_id: row.clinic_id.map(TenantId),
            created_at: row.created_at,
        })
    }
}

/// `role` may be a Postgres enum, so it is cast like the ids.
const LATEST_ROLE_SQL: &str = r#"
    SELECT role::text AS role, clinic_id::text AS clinic_id, created_at
    FROM user_roles
    WHERE user_id::text = $1
    ORDER BY created_at DESC
    LIMIT 1
"#;

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_latest_assignments(&self, user_id: &str) -> Result<Vec<RoleAssignment>, QueryError> {
        let rows: Vec<UserRoleRow> = sqlx::query_as(LATEST_ROLE_SQL)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error finding roles for user {}: {}", user_id, e);
                classify(e)
            })?;

        debug!("Found {} role rows for user {}", rows.len(), user_id);
        rows.into_iter().map(RoleAssignment::try_from).collect()
    }
}
