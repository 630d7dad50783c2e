use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, ClinicId, UserId};

/// Coarse-grained access level carried by every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator.
    SuperAdmin,
    /// Clinic owner or administrator.
    Master,
    /// Regular clinic staff member.
    User,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Master => "MASTER",
            Self::User => "USER",
        }
    }

    /// Returns whether this role bypasses the fine-grained permission list.
    #[must_use]
    pub fn overrides_permissions(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Master)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "MASTER" => Ok(Self::Master),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identity resolved once per request and threaded explicitly into services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    display_name: String,
    email: String,
    role: Role,
    clinic_id: ClinicId,
}

impl UserIdentity {
    /// Creates a user identity from account and membership data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        clinic_id: ClinicId,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email: email.into(),
            role,
            clinic_id,
        }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the coarse role of the user.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the clinic the request executes in.
    #[must_use]
    pub fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_roundtrip_storage_value() {
        for role in [Role::SuperAdmin, Role::Master, Role::User] {
            assert_eq!(Role::from_str(role.as_str()).ok(), Some(role));
        }
    }

    #[test]
    fn lowercase_role_is_rejected() {
        assert!(Role::from_str("master").is_err());
    }

    #[test]
    fn only_admin_roles_override_permissions() {
        assert!(Role::SuperAdmin.overrides_permissions());
        assert!(Role::Master.overrides_permissions());
        assert!(!Role::User.overrides_permissions());
    }

    #[test]
    fn role_serializes_as_storage_value() {
        let encoded = serde_json::to_string(&Role::SuperAdmin).unwrap_or_default();
        assert_eq!(encoded, "\"SUPER_ADMIN\"");
    }
}
