//! User management application service.
//!
//! Covers password login, clinic member search, account upsert by clinic
//! administrators and edits to the per-clinic permission set.

use std::sync::Arc;

use clinica_core::{AppError, AppResult, NonEmptyString, Role, UserId, UserIdentity};
use clinica_domain::{
    AuditAction, EmailAddress, Permission, PermissionSet, ensure_assignable_role,
    validate_password,
};
use tracing::info;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, ClinicScope, MembershipRepository, NewUser,
    Page, PasswordHasher, RecordSearch, UserRecord, UserRepository, UserSummary,
};

mod login;
mod management;
mod permissions;

/// Page size of the clinic member listing.
pub const USER_PAGE_SIZE: u32 = 10;

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials matched. A session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. The reason is not disclosed.
    Failed,
}

/// Input of the user upsert operation.
#[derive(Debug, Clone)]
pub struct UpsertUserInput {
    /// Existing user to update; `None` matches by email or creates.
    pub id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role to assign, `USER` or `MASTER`.
    pub role: Role,
    /// New password. Required when creating.
    pub password: Option<String>,
    /// Confirmation that must equal `password`.
    pub confirm_password: Option<String>,
}

/// Result of the user upsert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertUserOutcome {
    /// Affected user.
    pub user_id: UserId,
    /// Whether the account was created by this call.
    pub created: bool,
}

/// Application service for user accounts and clinic permissions.
#[derive(Clone)]
pub struct UserService {
    authorization_service: AuthorizationService,
    user_repository: Arc<dyn UserRepository>,
    membership_repository: Arc<dyn MembershipRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        user_repository: Arc<dyn UserRepository>,
        membership_repository: Arc<dyn MembershipRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            user_repository,
            membership_repository,
            password_hasher,
            audit_repository,
        }
    }

    async fn audit(
        &self,
        actor: &UserIdentity,
        scope: &ClinicScope,
        action: AuditAction,
        user_id: UserId,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                clinic_id: scope.clinic_id(),
                actor_user_id: actor.user_id(),
                action,
                resource_type: "user".to_owned(),
                resource_id: user_id.to_string(),
                detail,
            })
            .await
    }
}
