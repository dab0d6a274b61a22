use std::sync::Arc;

use clinic_core::domain::Identity;
use clinic_core::repositories::{
    ClientStorage, ClinicRepository, InMemorySessionStore, RoleRepository, ScopedStorage, SessionStore,
};
use clinic_core::services::{ClinicContext, SchemaProbe, UserManagementGate};

use crate::auth::JwtManager;

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtManager>,
    pub roles: Arc<dyn RoleRepository>,
    pub clinics: Arc<dyn ClinicRepository>,
    pub gate: Arc<UserManagementGate>,
    /// Survives restarts: active clinic selections and the name cache.
    pub durable_storage: Arc<dyn ClientStorage>,
    /// Process lifetime only: the post-login welcome marker.
    pub session_storage: Arc<dyn ClientStorage>,
    pub schema: Arc<SchemaProbe>,
}

impl AppState {
    pub fn new(
        jwt: JwtManager,
        roles: Arc<dyn RoleRepository>,
        clinics: Arc<dyn ClinicRepository>,
        durable_storage: Arc<dyn ClientStorage>,
        session_storage: Arc<dyn ClientStorage>,
    ) -> Self {
        Self {
            jwt: Arc::new(jwt),
            gate: Arc::new(UserManagementGate::new(roles.clone())),
            roles,
            clinics,
            durable_storage,
            session_storage,
            schema: Arc::new(SchemaProbe::new()),
        }
    }

    /// Resolution context for one caller, over that caller's slice of storage.
    pub fn clinic_context(&self, identity: Option<Identity>) -> ClinicContext {
        let storage = Arc::new(ScopedStorage::new(
            storage_prefix(identity.as_ref()),
            self.durable_storage.clone(),
        ));
        let session: Arc<dyn SessionStore> = Arc::new(match identity {
            Some(identity) => InMemorySessionStore::signed_in(identity),
            None => InMemorySessionStore::signed_out(),
        });

        ClinicContext::new(session, self.roles.clone(), self.clinics.clone(), storage)
            .with_schema_probe(self.schema.clone())
    }

    pub fn session_storage_for(&self, identity: &Identity) -> Arc<dyn ClientStorage> {
        Arc::new(ScopedStorage::new(
            storage_prefix(Some(identity)),
            self.session_storage.clone(),
        ))
    }
}

fn storage_prefix(identity: Option<&Identity>) -> String {
    match identity {
        Some(identity) => format!("user:{}", identity.user_id),
        None => "anonymous".to_string(),
    }
}
