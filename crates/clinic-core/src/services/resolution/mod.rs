// ============================================================================
// Clinic Core - Tenant Resolution Context
// File: crates/clinic-core/src/services/resolution/mod.rs
// Description: Shared state container for role, tenant and clinic metadata
// ============================================================================
//! [`ClinicContext`] owns the [`ResolutionState`] for one session.
//!
//! The field groups have one writer each: the resolver (`load_role_and_clinic`)
//! writes role, clinic id, error and loading flags; the selector
//! (`set_active_clinic_id`, `set_active_clinic_name`) writes the active
//! selection; the loader (`load_active_clinic`, `load_clinics_list_if_super_admin`)
//! writes clinic metadata and pause fields. Readers take snapshots.
//!
//! Every resolution cycle bumps a generation counter, and every change of the
//! active clinic bumps a clinic sequence. Lookups capture both when they start
//! and their results are dropped if either moved on before they finished.

mod loader;
mod resolver;
mod selector;
mod state;


use std::sync::Arc;

use clinic_shared::constants::{ACTIVE_CLINIC_KEY, RESOLUTION_EVENT_CAPACITY};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::TenantId;
use crate::repositories::{ClientStorage, ClinicRepository, RoleRepository, SessionStore};
use crate::services::guard::{self, GuardInput, RouteDecision};
use crate::services::name_cache::ClinicNameCache;

pub use loader::SchemaProbe;
use resolver::Resolution;
pub use state::{ResolutionEvent, ResolutionState};

#[derive(Debug, Default)]
struct Inner {
    state: ResolutionState,
    generation: u64,
    clinic_seq: u64,
    /// Sticky until reset: only the first cycle shows a loading state.
    loaded_once: bool,
}

/// Captured when a lookup starts; checked again when it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    generation: u64,
    clinic_seq: Option<u64>,
}

impl Ticket {
    fn matches(&self, inner: &Inner) -> bool {
        self.generation == inner.generation
            && self.clinic_seq.map_or(true, |seq| seq == inner.clinic_seq)
    }
}

pub struct ClinicContext {
    session: Arc<dyn SessionStore>,
    roles: Arc<dyn RoleRepository>,
    clinics: Arc<dyn ClinicRepository>,
    storage: Arc<dyn ClientStorage>,
    names: ClinicNameCache,
    schema: Arc<SchemaProbe>,
    inner: RwLock<Inner>,
    events: broadcast::Sender<ResolutionEvent>,
}

impl ClinicContext {
    pub fn new(
        session: Arc<dyn SessionStore>,
        roles: Arc<dyn RoleRepository>,
        clinics: Arc<dyn ClinicRepository>,
        storage: Arc<dyn ClientStorage>,
    ) -> Self {
        let (events, _) = broadcast::channel(RESOLUTION_EVENT_CAPACITY);
        Self {
            session,
            roles,
            clinics,
            names: ClinicNameCache::new(storage.clone()),
            storage,
            schema: Arc::new(SchemaProbe::new()),
            inner: RwLock::new(Inner::default()),
            events,
        }
    }

    /// Shares a schema probe so a degraded projection found by one context
    /// is where the next one starts.
    pub fn with_schema_probe(mut self, schema: Arc<SchemaProbe>) -> Self {
        self.schema = schema;
        self
    }

    pub fn snapshot(&self) -> ResolutionState {
        self.inner.read().state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.events.subscribe()
    }

    pub fn guard_input(&self) -> GuardInput {
        let session = self.session.snapshot();
        let inner = self.inner.read();
        GuardInput {
            is_authenticated: session.is_authenticated(),
            auth_loading: session.is_loading,
            role: inner.state.role,
            clinic_id: inner.state.clinic_id.clone(),
            tenant_loading: inner.state.is_loading,
            has_loaded_role: inner.state.has_loaded_role,
            error: inner.state.error.clone(),
            is_clinic_paused: inner.state.is_clinic_paused,
        }
    }

    pub fn decide_route(&self, location: &str) -> RouteDecision {
        let decision = guard::decide_route(&self.guard_input(), location);
        debug!("Route decision for {}: {:?}", location, decision);
        decision
    }

    /// Full resolution: role, then the clinic list, then the active clinic.
    pub async fn refresh(&self) -> Option<TenantId> {
        let active = match self.resolve().await {
            Resolution::Resolved(active) => active,
            Resolution::Halted => return None,
        };
        self.load_clinics_list_if_super_admin().await;
        // the selection may have changed while the list was loading
        self.load_active_clinic(None).await;
        active
    }

    /// Re-resolves on every session change until the session store goes away.
    ///
    /// Each refresh runs on its own task so a logout can reset the state
    /// while an earlier lookup is still in flight.
    pub fn follow_session(self: Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.session.subscribe();
        tokio::spawn(async move {
            loop {
                rx.borrow_and_update();
                let ctx = self.clone();
                tokio::spawn(async move {
                    ctx.refresh().await;
                });
                if rx.changed().await.is_err() {
                    debug!("Session store closed, no longer following");
                    break;
                }
            }
        })
    }

    /// Starts a new resolution cycle; anything still in flight from an
    /// earlier cycle becomes stale.
    fn begin_cycle(&self) -> Ticket {
        let mut inner = self.inner.write();
        inner.generation += 1;
        if !inner.loaded_once {
            inner.state.is_loading = true;
        }
        Ticket {
            generation: inner.generation,
            clinic_seq: None,
        }
    }

    fn reset(&self) {
        {
            let mut inner = self.inner.write();
            inner.generation += 1;
            inner.clinic_seq += 1;
            inner.loaded_once = false;
            inner.state = ResolutionState::default();
        }
        self.emit(ResolutionEvent::Reset);
    }

    /// Applies `f` if `ticket` is still current. `None` means the result was
    /// stale and nothing changed.
    fn commit<R>(&self, ticket: Ticket, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        let mut inner = self.inner.write();
        if !ticket.matches(&*inner) {
            debug!(
                "Discarding stale result (generation {} vs {})",
                ticket.generation, inner.generation
            );
            return None;
        }
        Some(f(&mut *inner))
    }

    fn emit(&self, event: ResolutionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn persisted_active_id(&self) -> Option<TenantId> {
        match self.storage.get_item(ACTIVE_CLINIC_KEY) {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(TenantId::new),
            Err(e) => {
                warn!("Failed to read persisted active clinic: {}", e);
                None
            }
        }
    }

    fn persist_active_id(&self, id: Option<&TenantId>) {
        let result = match id {
            Some(id) => self.storage.set_item(ACTIVE_CLINIC_KEY, id.as_str()),
            None => self.storage.remove_item(ACTIVE_CLINIC_KEY),
        };
        if let Err(e) = result {
            warn!("Failed to persist active clinic: {}", e);
        }
    }
}
