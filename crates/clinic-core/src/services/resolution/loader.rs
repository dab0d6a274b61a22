//! Clinic metadata loader with projection fallback

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, info, warn};

use super::{ClinicContext, ResolutionEvent, Ticket};
use crate::domain::{ClinicProjection, ClinicRecord, TenantId};
use crate::error::QueryError;

/// Remembers the richest clinic projection this database accepts.
///
/// Starts at [`ClinicProjection::Full`] and only ever narrows.
#[derive(Debug, Default)]
pub struct SchemaProbe {
    tier: AtomicU8,
}

impl SchemaProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ClinicProjection {
        match self.tier.load(Ordering::Acquire) {
            0 => ClinicProjection::Full,
            1 => ClinicProjection::WithoutPause,
            _ => ClinicProjection::Legacy,
        }
    }

    fn degrade_to(&self, projection: ClinicProjection) {
        let tier = match projection {
            ClinicProjection::Full => 0,
            ClinicProjection::WithoutPause => 1,
            ClinicProjection::Legacy => 2,
        };
        self.tier.fetch_max(tier, Ordering::AcqRel);
    }
}

impl ClinicContext {
    /// Loads the clinic record for `clinic_id`, or the active clinic id when
    /// none is given, into `active_clinic` and the pause fields.
    pub async fn load_active_clinic(&self, clinic_id: Option<TenantId>) {
        let (ticket, target) = {
            let mut inner = self.inner.write();
            inner.clinic_seq += 1;
            let target = clinic_id.or_else(|| inner.state.active_clinic_id.clone());
            let ticket = Ticket {
                generation: inner.generation,
                clinic_seq: Some(inner.clinic_seq),
            };
            (ticket, target)
        };

        let Some(id) = target else {
            if self.commit(ticket, |inner| inner.state.clear_active_clinic()).is_some() {
                self.emit(ResolutionEvent::ClinicCleared);
            }
            return;
        };

        let cached = self.names.get(&id);
        self.commit(ticket, |inner| inner.state.apply_cached_name(&id, cached));

        let clinics = self.clinics.as_ref();
        let target = &id;
        let result = self
            .with_schema_fallback("fetch_clinic", move |projection| {
                clinics.fetch_clinic(target, projection)
            })
            .await;

        match result {
            Ok(row) => {
                let record = ClinicRecord::from(row);
                self.names.put(&id, &record.name);
                let committed = self.commit(ticket, |inner| inner.state.set_active_clinic(record));
                if committed.is_some() {
                    debug!("Loaded clinic {}", id);
                    self.emit(ResolutionEvent::ClinicLoaded { clinic_id: id });
                }
            }
            Err(e) if e.is_not_found() => {
                warn!("Active clinic {} not found, clearing selection: {}", id, e);
                let committed = self.commit(ticket, |inner| {
                    let state = &mut inner.state;
                    state.clear_active_clinic();
                    if state.is_super_admin() && state.active_clinic_id.as_ref() == Some(&id) {
                        state.active_clinic_id = None;
                    }
                });
                if committed.is_some() {
                    if self.persisted_active_id().as_ref() == Some(&id) {
                        self.persist_active_id(None);
                    }
                    self.emit(ResolutionEvent::ClinicCleared);
                }
            }
            Err(e) => {
                warn!("Failed to load clinic {}, keeping cached name: {}", id, e);
                let cached = self.names.get(&id);
                self.commit(ticket, |inner| inner.state.apply_cached_name(&id, cached));
            }
        }
    }

    /// Fills `clinics` for super_admin; clears it for everyone else.
    pub async fn load_clinics_list_if_super_admin(&self) {
        let (ticket, is_super_admin) = {
            let inner = self.inner.read();
            let ticket = Ticket {
                generation: inner.generation,
                clinic_seq: None,
            };
            (ticket, inner.state.is_super_admin())
        };

        if !is_super_admin {
            self.commit(ticket, |inner| inner.state.clinics.clear());
            return;
        }

        let clinics = self.clinics.as_ref();
        let result = self
            .with_schema_fallback("list_clinics", move |projection| clinics.list_clinics(projection))
            .await;

        match result {
            Ok(rows) => {
                let records: Vec<ClinicRecord> = rows.into_iter().map(ClinicRecord::from).collect();
                self.names
                    .put_many(records.iter().map(|c| (&c.id, c.name.as_str())));
                let count = records.len();
                if self.commit(ticket, |inner| inner.state.clinics = records).is_some() {
                    debug!("Loaded {} clinics", count);
                    self.emit(ResolutionEvent::ClinicsListed { count });
                }
            }
            Err(e) => warn!("Failed to load clinic list, keeping previous: {}", e),
        }
    }

    /// Runs `query` from the remembered projection downwards, stepping to a
    /// narrower projection on every unknown-column error.
    async fn with_schema_fallback<T, F, Fut>(&self, op: &str, mut query: F) -> Result<T, QueryError>
    where
        F: FnMut(ClinicProjection) -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let mut projection = self.schema.current();
        loop {
            match query(projection).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_unknown_column() => match projection.narrower() {
                    Some(next) => {
                        info!(
                            "{} rejected {} projection ({}), retrying with {}",
                            op,
                            projection.as_str(),
                            e,
                            next.as_str()
                        );
                        self.schema.degrade_to(next);
                        projection = next;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }
}
