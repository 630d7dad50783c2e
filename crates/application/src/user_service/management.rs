use super::*;

impl UserService {
    /// Lists members of the actor's clinic.
    pub async fn search_users(
        &self,
        actor: &UserIdentity,
        search: RecordSearch,
    ) -> AppResult<Page<UserSummary>> {
        let scope = self
            .authorization_service
            .require_permission(actor, Permission::ManageUsers)
            .await?;

        self.user_repository
            .search_members(scope.query(RecordSearch {
                page_size: USER_PAGE_SIZE,
                ..search
            }))
            .await
    }

    /// Creates or updates an account and attaches it to the actor's clinic.
    ///
    /// Without an id, an existing account with the same email is updated.
    /// Accounts attached to another clinic cannot be taken over.
    pub async fn upsert_user(
        &self,
        actor: &UserIdentity,
        input: UpsertUserInput,
    ) -> AppResult<UpsertUserOutcome> {
        let scope = self.authorization_service.require_role_admin(actor).await?;

        let name = NonEmptyString::new(input.name)
            .map_err(|_| AppError::Validation("user name is required".to_owned()))?;
        let email = EmailAddress::new(input.email)?;
        let role = ensure_assignable_role(input.role)?;
        let password = input.password.filter(|value| !value.is_empty());
        if password.is_some() && password != input.confirm_password {
            return Err(AppError::Validation("passwords do not match".to_owned()));
        }

        let existing = match input.id {
            Some(user_id) => {
                let user = self
                    .user_repository
                    .find_by_id(user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

                if let Some(other) = self.user_repository.find_by_email(email.as_str()).await?
                    && other.id != user_id
                {
                    return Err(AppError::Conflict(format!(
                        "email '{}' is already registered",
                        email.as_str()
                    )));
                }

                Some(user)
            }
            None => self.user_repository.find_by_email(email.as_str()).await?,
        };

        let Some(user) = existing else {
            let Some(password) = password else {
                return Err(AppError::Validation(
                    "password is required for new users".to_owned(),
                ));
            };
            validate_password(&password)?;

            let created = self
                .user_repository
                .create(NewUser {
                    name: name.into(),
                    email: email.into(),
                    role,
                    password_hash: self.password_hasher.hash_password(&password)?,
                })
                .await?;
            self.membership_repository
                .ensure_membership(&scope, created.id)
                .await?;
            self.audit(actor, &scope, AuditAction::UserUpserted, created.id, None)
                .await?;

            info!(
                user_id = %actor.user_id(),
                clinic_id = %scope.clinic_id(),
                target_user_id = %created.id,
                "user created"
            );
            return Ok(UpsertUserOutcome {
                user_id: created.id,
                created: true,
            });
        };

        self.ensure_manageable(actor, &scope, &user).await?;

        let password_hash = match password {
            Some(password) => {
                validate_password(&password)?;
                Some(self.password_hasher.hash_password(&password)?)
            }
            None => None,
        };

        self.user_repository
            .update_profile(user.id, name.as_str(), email.as_str(), role)
            .await?;
        if let Some(password_hash) = password_hash {
            self.user_repository
                .update_password(user.id, &password_hash)
                .await?;
        }
        self.membership_repository
            .ensure_membership(&scope, user.id)
            .await?;

        self.audit(actor, &scope, AuditAction::UserUpserted, user.id, None)
            .await?;
        if user.role != role {
            self.audit(
                actor,
                &scope,
                AuditAction::UserRoleChanged,
                user.id,
                Some(format!("{} -> {}", user.role, role)),
            )
            .await?;
        }

        info!(
            user_id = %actor.user_id(),
            clinic_id = %scope.clinic_id(),
            target_user_id = %user.id,
            "user updated"
        );
        Ok(UpsertUserOutcome {
            user_id: user.id,
            created: false,
        })
    }

    async fn ensure_manageable(
        &self,
        actor: &UserIdentity,
        scope: &ClinicScope,
        user: &UserRecord,
    ) -> AppResult<()> {
        if user.role == Role::SuperAdmin && actor.role() != Role::SuperAdmin {
            return Err(AppError::Unauthorized(format!(
                "user '{}' is a SUPER_ADMIN account",
                user.id
            )));
        }

        let is_member = self
            .membership_repository
            .find_membership(user.id, scope.clinic_id())
            .await?
            .is_some();
        if is_member {
            return Ok(());
        }

        match self
            .membership_repository
            .find_primary_clinic(user.id)
            .await?
        {
            Some(other_clinic) => self
                .authorization_service
                .require_same_clinic(actor, other_clinic),
            None => Ok(()),
        }
    }
}
