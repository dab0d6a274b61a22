//! Repository, storage and session traits (ports)

pub mod role_repository;
pub mod clinic_repository;
pub mod storage;
pub mod session;

pub use role_repository::RoleRepository;
pub use clinic_repository::ClinicRepository;
pub use storage::{ClientStorage, MemoryStorage, ScopedStorage};
pub use session::{InMemorySessionStore, SessionSnapshot, SessionStore};

#[cfg(test)]
pub use role_repository::MockRoleRepository;
#[cfg(test)]
pub use clinic_repository::MockClinicRepository;
