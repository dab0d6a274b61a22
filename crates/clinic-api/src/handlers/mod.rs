//! HTTP handlers

pub mod clinic_users;
pub mod health;
pub mod session;
