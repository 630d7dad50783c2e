use async_trait::async_trait;
use clinica_application::{ClinicScope, MembershipRepository};
use clinica_core::{AppError, AppResult, ClinicId, UserId};
use clinica_domain::{Membership, PermissionSet};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// PostgreSQL-backed repository for `users_to_clinics` rows.
#[derive(Clone)]
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    user_id: Uuid,
    clinic_id: Uuid,
    permissions: Vec<String>,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self::new(
            UserId::from_uuid(row.user_id),
            ClinicId::from_uuid(row.clinic_id),
            permissions_from_storage(row.user_id, row.clinic_id, row.permissions),
        )
    }
}

/// Parses a stored permission array, dropping tags outside the catalog.
pub(crate) fn permissions_from_storage(
    user_id: Uuid,
    clinic_id: Uuid,
    stored: Vec<String>,
) -> PermissionSet {
    let (permissions, unknown) = PermissionSet::from_storage(stored);
    if !unknown.is_empty() {
        warn!(
            %user_id,
            %clinic_id,
            unknown = ?unknown,
            "ignoring stored permissions outside the catalog"
        );
    }

    permissions
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find_membership(
        &self,
        user_id: UserId,
        clinic_id: ClinicId,
    ) -> AppResult<Option<Membership>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT user_id, clinic_id, permissions
            FROM users_to_clinics
            WHERE user_id = $1 AND clinic_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(clinic_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find membership: {error}")))?;

        Ok(row.map(Membership::from))
    }

    async fn find_primary_clinic(&self, user_id: UserId) -> AppResult<Option<ClinicId>> {
        let clinic_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT clinic_id
            FROM users_to_clinics
            WHERE user_id = $1
            ORDER BY created_at ASC, clinic_id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user clinic: {error}")))?;

        Ok(clinic_id.map(ClinicId::from_uuid))
    }

    async fn ensure_membership(&self, scope: &ClinicScope, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users_to_clinics (user_id, clinic_id, permissions)
            VALUES ($1, $2, '{}')
            ON CONFLICT (user_id, clinic_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(scope.clinic_id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to ensure membership: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_permissions(
        &self,
        scope: &ClinicScope,
        user_id: UserId,
        permissions: &PermissionSet,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users_to_clinics
            SET permissions = $3, updated_at = now()
            WHERE clinic_id = $1 AND user_id = $2
            "#,
        )
        .bind(scope.clinic_id().as_uuid())
        .bind(user_id.as_uuid())
        .bind(permissions.to_storage())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update membership permissions: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
