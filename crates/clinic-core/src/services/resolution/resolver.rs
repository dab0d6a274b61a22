//! Role/tenant resolver

use tracing::{debug, error, info};

use super::{ClinicContext, ResolutionEvent, ResolutionState};
use crate::domain::{Role, RoleAssignment, TenantId};

/// How far a resolution cycle got.
pub(super) enum Resolution {
    /// Role committed; carries the resolved active clinic id.
    Resolved(Option<TenantId>),
    /// Signed out, lookup failed, or a newer cycle took over.
    Halted,
}

impl ClinicContext {
    /// Resolves role, assigned clinic and active clinic id for the current
    /// identity. Safe to call repeatedly.
    pub async fn load_role_and_clinic(&self) -> Option<TenantId> {
        match self.resolve().await {
            Resolution::Resolved(active) => active,
            Resolution::Halted => None,
        }
    }

    pub(super) async fn resolve(&self) -> Resolution {
        let Some(identity) = self.session.snapshot().identity else {
            debug!("No identity, clearing resolution state");
            self.reset();
            return Resolution::Halted;
        };

        let ticket = self.begin_cycle();
        debug!("Resolving role for user {}", identity.user_id);

        let rows = match self.roles.find_latest_assignments(&identity.user_id).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Role lookup failed for user {}: {}", identity.user_id, e);
                let message = e.to_string();
                let committed = self.commit(ticket, |inner| {
                    inner.state = ResolutionState {
                        error: Some(message.clone()),
                        has_loaded_role: true,
                        is_loading: false,
                        ..ResolutionState::default()
                    };
                    inner.loaded_once = true;
                });
                if committed.is_some() {
                    self.emit(ResolutionEvent::RoleFailed { message });
                }
                return Resolution::Halted;
            }
        };

        let (role, clinic_id) = match RoleAssignment::latest(rows) {
            Some(assignment) => (Some(assignment.role), assignment.clinic_id),
            None => (None, None),
        };

        let active = match role {
            Some(Role::SuperAdmin) => self.persisted_active_id().or_else(|| clinic_id.clone()),
            Some(_) => clinic_id.clone(),
            None => None,
        };
        let cached = active.as_ref().and_then(|id| self.names.get(id));

        let committed = self.commit(ticket, |inner| {
            if inner.state.active_clinic_id != active {
                inner.clinic_seq += 1;
            }
            let state = &mut inner.state;
            state.role = role;
            state.clinic_id = clinic_id.clone();
            state.active_clinic_id = active.clone();
            state.error = None;
            state.has_loaded_role = true;
            state.is_loading = false;
            match &active {
                Some(id) => state.apply_cached_name(id, cached),
                None => state.clear_active_clinic(),
            }
            inner.loaded_once = true;
        });

        if committed.is_none() {
            return Resolution::Halted;
        }

        info!(
            "Resolved user {}: role={} clinic={} active={}",
            identity.user_id,
            role.map_or("none", |r| r.as_str()),
            clinic_id.as_ref().map_or("none", TenantId::as_str),
            active.as_ref().map_or("none", TenantId::as_str),
        );
        self.emit(ResolutionEvent::RoleResolved {
            role,
            clinic_id,
            active_clinic_id: active.clone(),
        });
        Resolution::Resolved(active)
    }
}
