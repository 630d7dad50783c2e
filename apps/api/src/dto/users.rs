use std::str::FromStr;

use clinica_application::{UpsertUserInput, UpsertUserOutcome, UserSummary};
use clinica_core::{AppError, Role, UserId};
use clinica_domain::PermissionSet;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the member search.
#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub order_by: Option<String>,
    pub order: Option<String>,
}

/// Incoming payload for creating or updating a clinic member.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/upsert-user-request.ts"
)]
pub struct UpsertUserRequest {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl TryFrom<UpsertUserRequest> for UpsertUserInput {
    type Error = AppError;

    fn try_from(value: UpsertUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value
                .id
                .filter(|id| !id.trim().is_empty())
                .map(|id| UserId::parse(id.trim()))
                .transpose()?,
            name: value.name,
            email: value.email,
            role: Role::from_str(value.role.as_str())?,
            password: value.password,
            confirm_password: value.confirm_password,
        })
    }
}

/// Result of a member upsert.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/upsert-user-response.ts"
)]
pub struct UpsertUserResponse {
    pub user_id: String,
    pub created: bool,
}

impl From<UpsertUserOutcome> for UpsertUserResponse {
    fn from(value: UpsertUserOutcome) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            created: value.created,
        }
    }
}

/// API representation of a clinic member.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-summary-response.ts"
)]
pub struct UserSummaryResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(value: UserSummary) -> Self {
        Self {
            user_id: value.id.to_string(),
            name: value.name,
            email: value.email,
            role: value.role.as_str().to_owned(),
            permissions: value.permissions.to_storage(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Permission set of one member in the caller's clinic.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-permissions-response.ts"
)]
pub struct UserPermissionsResponse {
    pub user_id: String,
    pub permissions: Vec<String>,
}

impl UserPermissionsResponse {
    #[must_use]
    pub fn new(user_id: UserId, permissions: &PermissionSet) -> Self {
        Self {
            user_id: user_id.to_string(),
            permissions: permissions.to_storage(),
        }
    }
}

/// Incoming payload replacing a member's permission set.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-permissions-request.ts"
)]
pub struct UpdateUserPermissionsRequest {
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clinica_application::UpsertUserInput;
    use clinica_core::{AppError, Role};

    use super::UpsertUserRequest;

    fn request(id: Option<&str>, role: &str) -> UpsertUserRequest {
        UpsertUserRequest {
            id: id.map(ToOwned::to_owned),
            name: "Bia".to_owned(),
            email: "bia@clinic.test".to_owned(),
            role: role.to_owned(),
            password: None,
            confirm_password: None,
        }
    }

    #[test]
    fn blank_id_means_create() {
        let input = UpsertUserInput::try_from(request(Some(" "), "USER"));
        assert_eq!(input.map(|value| (value.id, value.role)).ok(), Some((None, Role::User)));
    }

    #[test]
    fn malformed_id_and_role_are_rejected() {
        assert!(matches!(
            UpsertUserInput::try_from(request(Some("nope"), "USER")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            UpsertUserInput::try_from(request(None, "OWNER")),
            Err(AppError::Validation(_))
        ));
    }
}
