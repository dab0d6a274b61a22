//! # Clinic Core
//! 
//! Domain types, repository ports, and the tenant resolution services
//! (resolver, active-clinic selector, metadata loader, route guard).

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{GateError, QueryError, QueryErrorKind, StorageError};
