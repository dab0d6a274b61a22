// ============================================================================
// Clinic Core - Clinic Entity
// File: crates/clinic-core/src/domain/clinic.rs
// Description: Tenant identifier, raw clinic rows and the normalized record
// ============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clinic (tenant) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Column set requested from the clinics table, richest first.
///
/// Older deployments lack the pause columns, and the oldest ones also lack
/// the admin join, so callers walk down this list on unknown-column errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicProjection {
    /// id, name, slug, pause columns, joined admin email
    Full,
    /// id, name, slug, joined admin email
    WithoutPause,
    /// id, name, slug
    Legacy,
}

impl ClinicProjection {
    pub fn narrower(&self) -> Option<Self> {
        match self {
            ClinicProjection::Full => Some(ClinicProjection::WithoutPause),
            ClinicProjection::WithoutPause => Some(ClinicProjection::Legacy),
            ClinicProjection::Legacy => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicProjection::Full => "full",
            ClinicProjection::WithoutPause => "without_pause",
            ClinicProjection::Legacy => "legacy",
        }
    }
}

/// Clinic row as returned by the query layer; columns missing from the
/// requested projection come back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicRow {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub is_paused: Option<bool>,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,
    pub admin_email: Option<String>,
}

/// Normalized clinic record held by the resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicRecord {
    pub id: TenantId,
    pub name: String,
    pub slug: Option<String>,
    pub is_paused: bool,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,
    pub admin_email: Option<String>,
}

impl ClinicRecord {
    /// Record built from a cached display name only, shown until the fetch lands.
    pub fn from_cached_name(id: TenantId, name: String) -> Self {
        Self {
            id,
            name,
            slug: None,
            is_paused: false,
            paused_at: None,
            pause_reason: None,
            admin_email: None,
        }
    }
}

impl From<ClinicRow> for ClinicRecord {
    fn from(row: ClinicRow) -> Self {
        ClinicRecord {
            id: TenantId(row.id),
            name: row.name,
            slug: row.slug,
            is_paused: row.is_paused.unwrap_or(false),
            paused_at: row.paused_at,
            pause_reason: row.pause_reason.filter(|r| !r.trim().is_empty()),
            admin_email: row.admin_email.filter(|e| !e.trim().is_empty()),
        }
    }
}
