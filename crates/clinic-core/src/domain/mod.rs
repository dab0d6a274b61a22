//! # Clinic Core - Domain Module
//! 
//! Domain entities for tenant resolution.

pub mod role;
pub mod identity;
pub mod clinic;
pub mod role_assignment;

// Re-export all entities and enums
pub use role::{Role, Capability};
pub use identity::Identity;
pub use clinic::{TenantId, ClinicRecord, ClinicRow, ClinicProjection};
pub use role_assignment::RoleAssignment;
