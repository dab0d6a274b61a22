//! Composite resolution record and its change notifications

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ClinicRecord, Role, TenantId};

/// Everything resolved for the current identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionState {
    pub role: Option<Role>,
    pub clinic_id: Option<TenantId>,
    pub active_clinic_id: Option<TenantId>,
    pub active_clinic: Option<ClinicRecord>,
    pub is_clinic_paused: bool,
    pub clinic_paused_at: Option<DateTime<Utc>>,
    pub clinic_pause_reason: Option<String>,
    pub clinics: Vec<ClinicRecord>,
    pub is_loading: bool,
    pub has_loaded_role: bool,
    pub error: Option<String>,
}

impl ResolutionState {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_super_admin())
    }

    pub fn is_orphan(&self) -> bool {
        self.role.is_some_and(|r| !r.is_super_admin()) && self.clinic_id.is_none()
    }

    pub(crate) fn clear_pause(&mut self) {
        self.is_clinic_paused = false;
        self.clinic_paused_at = None;
        self.clinic_pause_reason = None;
    }

    pub(crate) fn clear_active_clinic(&mut self) {
        self.active_clinic = None;
        self.clear_pause();
    }

    /// Shows the cached display name for `id` until a fetch lands.
    ///
    /// A record for the same id only gets its name replaced. A record for a
    /// different id is dropped, and replaced by a name-only record when the
    /// cache knows one.
    pub(crate) fn apply_cached_name(&mut self, id: &TenantId, cached: Option<String>) {
        let same = self.active_clinic.as_ref().is_some_and(|r| r.id == *id);
        match cached {
            Some(name) if same => {
                if let Some(record) = self.active_clinic.as_mut() {
                    record.name = name;
                }
            }
            Some(name) => {
                self.clear_pause();
                self.active_clinic = Some(ClinicRecord::from_cached_name(id.clone(), name));
            }
            None if same => {}
            None => self.clear_active_clinic(),
        }
    }

    /// Pause fields follow the fetched record, except that super_admin is
    /// never considered paused.
    pub(crate) fn set_active_clinic(&mut self, record: ClinicRecord) {
        if self.is_super_admin() {
            self.clear_pause();
        } else {
            self.is_clinic_paused = record.is_paused;
            self.clinic_paused_at = record.paused_at;
            self.clinic_pause_reason = record.pause_reason.clone();
        }
        self.active_clinic = Some(record);
    }

    pub(crate) fn rename_clinic(&mut self, id: &TenantId, name: &str) {
        match self.active_clinic.as_mut() {
            Some(record) if record.id == *id => record.name = name.to_string(),
            Some(_) => {}
            None if self.active_clinic_id.as_ref() == Some(id) => {
                self.active_clinic = Some(ClinicRecord::from_cached_name(id.clone(), name.to_string()));
            }
            None => {}
        }
        for clinic in self.clinics.iter_mut().filter(|c| c.id == *id) {
            clinic.name = name.to_string();
        }
    }
}

/// Published on every committed change to the resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolutionEvent {
    Reset,
    RoleResolved {
        role: Option<Role>,
        clinic_id: Option<TenantId>,
        active_clinic_id: Option<TenantId>,
    },
    RoleFailed {
        message: String,
    },
    ActiveClinicSelected {
        clinic_id: Option<TenantId>,
    },
    ClinicLoaded {
        clinic_id: TenantId,
    },
    ClinicCleared,
    ClinicRenamed {
        clinic_id: TenantId,
        name: String,
    },
    ClinicsListed {
        count: usize,
    },
}
