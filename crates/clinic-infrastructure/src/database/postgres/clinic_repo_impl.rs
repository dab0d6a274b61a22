// ============================================================================
// Clinic Infrastructure - PostgreSQL Clinic Repository
// File: crates/clinic-infrastructure/src/database/postgres/clinic_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, error};

use clinic_core::domain::{ClinicProjection, ClinicRow, TenantId};
use clinic_core::error::QueryError;
use clinic_core::repositories::ClinicRepository;

use super::error::classify;

/// Email of the clinic's earliest admin.
const ADMIN_EMAIL: &str = r#"(
                SELECT p.email
                FROM user_roles ur
                JOIN profiles p ON p.id = ur.user_id
                WHERE ur.clinic_id = c.id AND ur.role = 'admin'
                ORDER BY ur.created_at ASC
                LIMIT 1
            )"#;

pub struct PgClinicRepository {
    pool: PgPool,
}

impl PgClinicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping. Every projection yields all columns;
// the ones it does not select come back as typed NULLs.
#[derive(Debug, FromRow)]
struct ClinicDbRow {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub is_paused: Option<bool>,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,
    pub admin_email: Option<String>,
}

impl From<ClinicDbRow> for ClinicRow {
    fn from(row: ClinicDbRow) -> Self {
        ClinicRow {
            id: row.id,
            name: row.name,
            slug: row.slug,
            is_paused: row.is_paused,
            paused_at: row.paused_at,
            pause_reason: row.pause_reason,
            admin_email: row.admin_email,
        }
    }
}

fn select_list(projection: ClinicProjection) -> String {
    let pause = match projection {
        ClinicProjection::Full => "c.is_paused, c.paused_at, c.pause_reason",
        ClinicProjection::WithoutPause | ClinicProjection::Legacy => {
            "NULL::boolean AS is_paused, NULL::timestamptz AS paused_at, NULL::text AS pause_reason"
        }
    };
    let admin = match projection {
        ClinicProjection::Legacy => "NULL::text".to_string(),
        _ => ADMIN_EMAIL.to_string(),
    };
    format!(
        "c.id::text AS id, c.name, c.slug, {}, {} AS admin_email",
        pause, admin
    )
}

fn fetch_sql(projection: ClinicProjection) -> String {
    format!(
        "SELECT {} FROM clinics c WHERE c.id::text = $1",
        select_list(projection)
    )
}

fn list_sql(projection: ClinicProjection) -> String {
    format!(
        "SELECT {} FROM clinics c ORDER BY c.created_at DESC",
        select_list(projection)
    )
}

#[async_trait]
impl ClinicRepository for PgClinicRepository {
    async fn fetch_clinic(&self, id: &TenantId, projection: ClinicProjection) -> Result<ClinicRow, QueryError> {
        let sql = fetch_sql(projection);
        let row: ClinicDbRow = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!(
                    "Database error fetching clinic {} ({}): {}",
                    id,
                    projection.as_str(),
                    e
                );
                classify(e)
            })?;

        Ok(row.into())
    }

    async fn list_clinics(&self, projection: ClinicProjection) -> Result<Vec<ClinicRow>, QueryError> {
        let sql = list_sql(projection);
        let rows: Vec<ClinicDbRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error listing clinics ({}): {}", projection.as_str(), e);
                classify(e)
            })?;

        debug!("Listed {} clinics", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_projection_reads_pause_columns_and_admin() {
        let sql = fetch_sql(ClinicProjection::Full);
        assert!(sql.contains("c.is_paused, c.paused_at, c.pause_reason"));
        assert!(sql.contains("JOIN profiles"));
        assert!(sql.ends_with("WHERE c.id::text = $1"));
    }

    #[test]
    fn test_without_pause_projection_keeps_admin_join() {
        let sql = fetch_sql(ClinicProjection::WithoutPause);
        assert!(!sql.contains("c.is_paused"));
        assert!(sql.contains("NULL::boolean AS is_paused"));
        assert!(sql.contains("JOIN profiles"));
    }

    #[test]
    fn test_legacy_projection_is_bare() {
        let sql = list_sql(ClinicProjection::Legacy);
        assert!(!sql.contains("c.is_paused"));
        assert!(!sql.contains("profiles"));
        assert!(sql.contains("NULL::text AS admin_email"));
        assert!(sql.ends_with("ORDER BY c.created_at DESC"));
    }
}
