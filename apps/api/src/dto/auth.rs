use clinica_core::UserIdentity;
use clinica_domain::{Clinic, PermissionSet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Login result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub user_id: String,
    pub role: String,
    /// False until the account owns or joins a clinic.
    pub has_clinic: bool,
}

/// Resolved identity of the current session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub clinic_id: String,
    pub clinic_name: String,
    pub permissions: Vec<String>,
}

impl MeResponse {
    #[must_use]
    pub fn new(identity: &UserIdentity, clinic: &Clinic, permissions: &PermissionSet) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            name: identity.display_name().to_owned(),
            email: identity.email().to_owned(),
            role: identity.role().as_str().to_owned(),
            clinic_id: clinic.id().to_string(),
            clinic_name: clinic.name().to_owned(),
            permissions: permissions.to_storage(),
        }
    }
}
