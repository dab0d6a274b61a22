//! # Clinic API
//! 
//! HTTP gateway: bearer verification, the clinic-users gate, session
//! resolution endpoints and the response envelope.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
