//! Bearer token verification and request gates

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtError, JwtManager};
pub use middleware::require_clinic_admin;
