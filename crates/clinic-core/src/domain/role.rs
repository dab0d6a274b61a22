// ============================================================================
// Clinic Core - Role & Capability
// File: crates/clinic-core/src/domain/role.rs
// Description: Roles and the declarative role -> capability table
// ============================================================================

use serde::{Deserialize, Serialize};

/// Role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Dentist,
    Receptionist,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dentist => "dentist",
            Role::Receptionist => "receptionist",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "dentist" => Some(Role::Dentist),
            "receptionist" => Some(Role::Receptionist),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Platform-scoped role, not tied to one clinic.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::Dentist => DENTIST_CAPABILITIES,
            Role::Receptionist => RECEPTIONIST_CAPABILITIES,
            Role::SuperAdmin => SUPER_ADMIN_CAPABILITIES,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// What a role may reach, consulted by navigation and server-side gates alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewDashboard,
    ManagePatients,
    ManageAppointments,
    ManageInvoices,
    ManageInventory,
    ManageClinicUsers,
    ManageClinicSettings,
    SwitchActiveClinic,
    ViewPlatformConsole,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::ManagePatients,
    Capability::ManageAppointments,
    Capability::ManageInvoices,
    Capability::ManageInventory,
    Capability::ManageClinicUsers,
    Capability::ManageClinicSettings,
];

const DENTIST_CAPABILITIES: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::ManagePatients,
    Capability::ManageAppointments,
];

const RECEPTIONIST_CAPABILITIES: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::ManagePatients,
    Capability::ManageAppointments,
    Capability::ManageInvoices,
];

// super_admin works on whichever clinic is active, but never manages its users
const SUPER_ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewDashboard,
    Capability::ManagePatients,
    Capability::ManageAppointments,
    Capability::ManageInvoices,
    Capability::ManageInventory,
    Capability::ManageClinicSettings,
    Capability::SwitchActiveClinic,
    Capability::ViewPlatformConsole,
];
