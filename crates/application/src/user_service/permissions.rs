use super::*;

impl UserService {
    /// Returns a member's permission set in the actor's clinic.
    ///
    /// Users without a membership there have an empty set.
    pub async fn get_user_permissions(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<PermissionSet> {
        let scope = self
            .authorization_service
            .require_permission(actor, Permission::ManagePermissions)
            .await?;

        Ok(self
            .membership_repository
            .find_membership(user_id, scope.clinic_id())
            .await?
            .map(|membership| membership.permissions().clone())
            .unwrap_or_default())
    }

    /// Replaces a member's permission set in the actor's clinic.
    pub async fn update_user_permissions(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        permissions: PermissionSet,
    ) -> AppResult<PermissionSet> {
        let scope = self.authorization_service.require_role_admin(actor).await?;
        self.store_permissions(actor, &scope, user_id, permissions)
            .await
    }

    /// Adds one permission to a member's set. Granting a held permission is a no-op.
    pub async fn grant_permission(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        permission: Permission,
    ) -> AppResult<PermissionSet> {
        let scope = self.authorization_service.require_role_admin(actor).await?;
        let mut permissions = self.member_permissions(&scope, user_id).await?;

        if !permissions.grant(permission) {
            return Ok(permissions);
        }
        self.store_permissions(actor, &scope, user_id, permissions)
            .await
    }

    /// Removes one permission from a member's set. Revoking a missing permission is a no-op.
    pub async fn revoke_permission(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        permission: Permission,
    ) -> AppResult<PermissionSet> {
        let scope = self.authorization_service.require_role_admin(actor).await?;
        let mut permissions = self.member_permissions(&scope, user_id).await?;

        if !permissions.revoke(permission) {
            return Ok(permissions);
        }
        self.store_permissions(actor, &scope, user_id, permissions)
            .await
    }

    async fn member_permissions(
        &self,
        scope: &ClinicScope,
        user_id: UserId,
    ) -> AppResult<PermissionSet> {
        self.membership_repository
            .find_membership(user_id, scope.clinic_id())
            .await?
            .map(|membership| membership.permissions().clone())
            .ok_or_else(|| not_a_member(scope, user_id))
    }

    async fn store_permissions(
        &self,
        actor: &UserIdentity,
        scope: &ClinicScope,
        user_id: UserId,
        permissions: PermissionSet,
    ) -> AppResult<PermissionSet> {
        if !self
            .membership_repository
            .replace_permissions(scope, user_id, &permissions)
            .await?
        {
            return Err(not_a_member(scope, user_id));
        }

        self.audit(
            actor,
            scope,
            AuditAction::PermissionsUpdated,
            user_id,
            Some(permissions.to_storage().join(",")),
        )
        .await?;

        info!(
            user_id = %actor.user_id(),
            clinic_id = %scope.clinic_id(),
            target_user_id = %user_id,
            permissions = permissions.len(),
            "permissions updated"
        );
        Ok(permissions)
    }
}

fn not_a_member(scope: &ClinicScope, user_id: UserId) -> AppError {
    AppError::NotFound(format!(
        "user '{user_id}' is not a member of clinic '{}'",
        scope.clinic_id()
    ))
}
