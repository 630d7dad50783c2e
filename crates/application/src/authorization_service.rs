use std::sync::Arc;

use clinica_core::{AppError, AppResult, ClinicId, UserIdentity};
use clinica_domain::{Permission, PermissionSet};
use tracing::{debug, info};

use crate::{ClinicScope, MembershipRepository};

/// Application service implementing the clinic permission gate.
///
/// SUPER_ADMIN and MASTER pass every check inside a clinic where they hold a
/// membership, whatever the membership's permission set contains. Any other
/// role needs the exact permission in the membership for that clinic.
/// A missing membership and a missing permission are both denials.
#[derive(Clone)]
pub struct AuthorizationService {
    membership_repository: Arc<dyn MembershipRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a membership repository.
    #[must_use]
    pub fn new(membership_repository: Arc<dyn MembershipRepository>) -> Self {
        Self {
            membership_repository,
        }
    }

    /// Returns whether the actor may use the permission inside the clinic.
    pub async fn can(
        &self,
        actor: &UserIdentity,
        clinic_id: ClinicId,
        permission: Permission,
    ) -> AppResult<bool> {
        let Some(membership) = self
            .membership_repository
            .find_membership(actor.user_id(), clinic_id)
            .await?
        else {
            return Ok(false);
        };

        Ok(actor.role().overrides_permissions() || membership.grants(permission))
    }

    /// Ensures the actor holds the permission in their resolved clinic.
    ///
    /// Returns the scope every tenant query of the operation must use.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<ClinicScope> {
        let clinic_id = actor.clinic_id();

        if self.can(actor, clinic_id, permission).await? {
            debug!(
                user_id = %actor.user_id(),
                clinic_id = %clinic_id,
                permission = permission.as_str(),
                "permission granted"
            );
            return Ok(ClinicScope::new(clinic_id));
        }

        info!(
            user_id = %actor.user_id(),
            clinic_id = %clinic_id,
            permission = permission.as_str(),
            "permission denied"
        );
        Err(AppError::Unauthorized(format!(
            "user '{}' is missing permission '{}' in clinic '{clinic_id}'",
            actor.user_id(),
            permission.as_str()
        )))
    }

    /// Ensures the actor administers their clinic (MASTER or SUPER_ADMIN with a membership).
    pub async fn require_role_admin(&self, actor: &UserIdentity) -> AppResult<ClinicScope> {
        let clinic_id = actor.clinic_id();
        let is_member = self
            .membership_repository
            .find_membership(actor.user_id(), clinic_id)
            .await?
            .is_some();

        if is_member && actor.role().overrides_permissions() {
            debug!(
                user_id = %actor.user_id(),
                clinic_id = %clinic_id,
                role = actor.role().as_str(),
                "clinic administration granted"
            );
            return Ok(ClinicScope::new(clinic_id));
        }

        info!(
            user_id = %actor.user_id(),
            clinic_id = %clinic_id,
            role = actor.role().as_str(),
            "clinic administration denied"
        );
        Err(AppError::Unauthorized(format!(
            "user '{}' must be MASTER in clinic '{clinic_id}'",
            actor.user_id()
        )))
    }

    /// Ensures a request addressing `clinic_id` stays inside the actor's clinic.
    pub fn require_same_clinic(&self, actor: &UserIdentity, clinic_id: ClinicId) -> AppResult<()> {
        if actor.clinic_id() == clinic_id {
            return Ok(());
        }

        info!(
            user_id = %actor.user_id(),
            clinic_id = %actor.clinic_id(),
            requested_clinic_id = %clinic_id,
            "tenant mismatch"
        );
        Err(AppError::TenantMismatch(format!(
            "clinic '{clinic_id}' does not match the session clinic"
        )))
    }

    /// Returns the permissions the actor effectively holds in their clinic.
    ///
    /// Administrators receive the full catalog.
    pub async fn effective_permissions(&self, actor: &UserIdentity) -> AppResult<PermissionSet> {
        let membership = self
            .membership_repository
            .find_membership(actor.user_id(), actor.clinic_id())
            .await?;

        Ok(match membership {
            None => PermissionSet::new(),
            Some(_) if actor.role().overrides_permissions() => {
                Permission::all().iter().copied().collect()
            }
            Some(membership) => membership.permissions().clone(),
        })
    }
}
