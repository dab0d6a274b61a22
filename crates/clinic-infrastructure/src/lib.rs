//! # Clinic Infrastructure
//! 
//! PostgreSQL adapters for the role and clinic queries, and durable
//! file-backed client storage.

pub mod database;
pub mod storage;

pub use database::{create_pool, PgClinicRepository, PgRoleRepository};
pub use storage::JsonFileStorage;
