//! Tenant resolution and authorization services

pub mod guard;
pub mod name_cache;
pub mod resolution;
pub mod user_gate;
pub mod welcome;

pub use guard::{decide_route, evaluate, ClinicAccess, GuardInput, GuardState, RouteDecision};
pub use name_cache::ClinicNameCache;
pub use resolution::{ClinicContext, ResolutionEvent, ResolutionState, SchemaProbe};
pub use user_gate::{ClinicAdminContext, UserManagementGate};
pub use welcome::WelcomeNotice;
