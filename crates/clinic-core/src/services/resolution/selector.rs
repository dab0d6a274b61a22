//! Active-clinic selector

use tracing::{debug, info};

use super::{ClinicContext, ResolutionEvent};
use crate::domain::{Role, TenantId};

impl ClinicContext {
    /// Switches the clinic a super_admin is looking at and persists the
    /// choice. Returns `false` (and changes nothing) for every other role.
    ///
    /// Only the cached name is applied here; call `load_active_clinic` to
    /// fetch the record itself.
    pub fn set_active_clinic_id(&self, clinic_id: Option<TenantId>) -> bool {
        let cached = clinic_id.as_ref().and_then(|id| self.names.get(id));

        {
            let mut inner = self.inner.write();
            if inner.state.role != Some(Role::SuperAdmin) {
                debug!("Ignoring active clinic change for non super_admin");
                return false;
            }
            inner.clinic_seq += 1;
            let state = &mut inner.state;
            state.active_clinic_id = clinic_id.clone();
            match &clinic_id {
                Some(id) => state.apply_cached_name(id, cached),
                None => state.clear_active_clinic(),
            }
        }

        self.persist_active_id(clinic_id.as_ref());
        info!(
            "Active clinic set to {}",
            clinic_id.as_ref().map_or("none", TenantId::as_str)
        );
        self.emit(ResolutionEvent::ActiveClinicSelected { clinic_id });
        true
    }

    /// Records a new display name for the active clinic (after a rename).
    pub fn set_active_clinic_name(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let target = {
            let inner = self.inner.read();
            inner
                .state
                .active_clinic_id
                .clone()
                .or_else(|| inner.state.active_clinic.as_ref().map(|c| c.id.clone()))
        };
        let Some(id) = target else {
            debug!("No active clinic to rename");
            return;
        };

        self.names.put(&id, name);
        self.inner.write().state.rename_clinic(&id, name);
        self.emit(ResolutionEvent::ClinicRenamed {
            clinic_id: id,
            name: name.to_string(),
        });
    }
}
