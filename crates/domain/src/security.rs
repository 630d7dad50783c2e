use std::collections::BTreeSet;
use std::str::FromStr;

use clinica_core::AppError;
use serde::{Deserialize, Serialize};

/// Grantable capabilities inside a clinic.
///
/// This enum is the only catalog of permission tags; every other
/// representation (API listing, stored arrays) is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows viewing the main dashboard.
    ViewDashboard,
    /// Allows managing doctors.
    ManageDoctors,
    /// Allows managing patients.
    ManagePatients,
    /// Allows managing appointments.
    ManageAppointments,
    /// Allows managing clients.
    ManageClients,
    /// Allows managing exams.
    ManageExams,
    /// Allows managing users.
    ManageUsers,
    /// Allows granting and revoking permissions of other users.
    ManagePermissions,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ManageDoctors => "manage_doctors",
            Self::ManagePatients => "manage_patients",
            Self::ManageAppointments => "manage_appointments",
            Self::ManageClients => "manage_clients",
            Self::ManageExams => "manage_exams",
            Self::ManageUsers => "manage_users",
            Self::ManagePermissions => "manage_permissions",
        }
    }

    /// Returns a short human-readable label.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "View dashboard",
            Self::ManageDoctors => "Manage doctors",
            Self::ManagePatients => "Manage patients",
            Self::ManageAppointments => "Manage appointments",
            Self::ManageClients => "Manage clients",
            Self::ManageExams => "Manage exams",
            Self::ManageUsers => "Manage users",
            Self::ManagePermissions => "Manage permissions",
        }
    }

    /// Returns a one-sentence description of what the permission allows.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "Allows the user to view the main dashboard.",
            Self::ManageDoctors => "Allows the user to add, edit and remove doctors.",
            Self::ManagePatients => "Allows the user to add, edit and remove patients.",
            Self::ManageAppointments => "Allows the user to add, edit and remove appointments.",
            Self::ManageClients => "Allows the user to add, edit and remove clients.",
            Self::ManageExams => "Allows the user to add, edit and remove exams.",
            Self::ManageUsers => "Allows the user to add, edit and remove users.",
            Self::ManagePermissions => {
                "Allows the user to assign and remove permissions of other users."
            }
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ViewDashboard,
            Permission::ManageDoctors,
            Permission::ManagePatients,
            Permission::ManageAppointments,
            Permission::ManageClients,
            Permission::ManageExams,
            Permission::ManageUsers,
            Permission::ManagePermissions,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// Unordered, duplicate-free set of permissions held by one membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses transport values, rejecting any tag outside the catalog.
    pub fn from_transport<I, S>(values: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .map(|value| Permission::from_transport(value.as_ref()))
            .collect()
    }

    /// Builds a set from stored tags, returning the tags that are not in the catalog.
    #[must_use]
    pub fn from_storage<I, S>(values: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        let mut unknown = Vec::new();

        for value in values {
            match Permission::from_str(value.as_ref()) {
                Ok(permission) => {
                    set.grant(permission);
                }
                Err(_) => unknown.push(value.as_ref().to_owned()),
            }
        }

        (set, unknown)
    }

    /// Returns sorted storage values.
    #[must_use]
    pub fn to_storage(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|permission| permission.as_str().to_owned())
            .collect()
    }

    /// Adds a permission. Returns `false` when it was already present.
    pub fn grant(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    /// Removes a permission. Returns `false` when it was not present.
    pub fn revoke(&mut self, permission: Permission) -> bool {
        self.0.remove(&permission)
    }

    /// Returns whether the permission is in the set.
    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Iterates permissions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of distinct permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a clinic is created with its first membership.
    ClinicCreated,
    /// Emitted when a user account is created or updated.
    UserUpserted,
    /// Emitted when a user's role changes.
    UserRoleChanged,
    /// Emitted when a membership permission set is replaced.
    PermissionsUpdated,
    /// Emitted when a client is deleted.
    ClientDeleted,
    /// Emitted when a patient is deleted.
    PatientDeleted,
    /// Emitted when an exam is deleted.
    ExamDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicCreated => "clinic.created",
            Self::UserUpserted => "user.upserted",
            Self::UserRoleChanged => "user.role_changed",
            Self::PermissionsUpdated => "membership.permissions_updated",
            Self::ClientDeleted => "client.deleted",
            Self::PatientDeleted => "patient.deleted",
            Self::ExamDeleted => "exam.deleted",
        }
    }
}
