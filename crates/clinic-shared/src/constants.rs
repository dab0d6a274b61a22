//! Application-wide constants

/// Durable key holding the super admin's active clinic override.
pub const ACTIVE_CLINIC_KEY: &str = "active_clinic_id";
/// Durable key holding the JSON `{ clinic_id: display_name }` cache.
pub const CLINIC_NAME_CACHE_KEY: &str = "clinic_name_cache";
/// Session-scoped one-shot marker set right after login.
pub const WELCOME_TOAST_KEY: &str = "show_welcome_toast";

pub const LOGIN_PATH: &str = "/login";
pub const PENDING_APPROVAL_PATH: &str = "/pending-approval";
pub const CLINIC_DISABLED_PATH: &str = "/clinic-disabled";
pub const DEFAULT_HOME_PATH: &str = "/dashboard";

pub const RESOLUTION_EVENT_CAPACITY: usize = 64;
