//! PostgreSQL repository implementations

mod error;
pub mod role_repo_impl;
pub mod clinic_repo_impl;

pub use role_repo_impl::PgRoleRepository;
pub use clinic_repo_impl::PgClinicRepository;
