use chrono::{DateTime, Utc};
use clinica_core::{AppResult, ClinicId, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

use crate::security::{Permission, PermissionSet};

/// Tenant boundary owning every client, patient and exam record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinic {
    id: ClinicId,
    name: NonEmptyString,
    created_at: DateTime<Utc>,
}

impl Clinic {
    /// Creates a clinic value.
    pub fn new(id: ClinicId, name: impl Into<String>, created_at: DateTime<Utc>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            created_at,
        })
    }

    /// Returns the clinic identifier.
    #[must_use]
    pub fn id(&self) -> ClinicId {
        self.id
    }

    /// Returns the clinic name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Association between one user and one clinic, carrying the permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    user_id: UserId,
    clinic_id: ClinicId,
    permissions: PermissionSet,
}

impl Membership {
    /// Creates a membership value.
    #[must_use]
    pub fn new(user_id: UserId, clinic_id: ClinicId, permissions: PermissionSet) -> Self {
        Self {
            user_id,
            clinic_id,
            permissions,
        }
    }

    /// Returns the member user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the clinic of the membership.
    #[must_use]
    pub fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }

    /// Returns the granted permission set.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the membership grants the permission.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use clinica_core::{ClinicId, UserId};

    use super::{Clinic, Membership};
    use crate::security::{Permission, PermissionSet};

    #[test]
    fn clinic_requires_name() {
        assert!(Clinic::new(ClinicId::new(), " ", Utc::now()).is_err());
    }

    #[test]
    fn membership_grants_only_listed_permissions() {
        let membership = Membership::new(
            UserId::new(),
            ClinicId::new(),
            PermissionSet::from_iter([Permission::ManageClients]),
        );

        assert!(membership.grants(Permission::ManageClients));
        assert!(!membership.grants(Permission::ManageUsers));
    }
}
