use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_application::ClinicRepository;
use clinica_core::{AppError, AppResult, ClinicId, UserId};
use clinica_domain::Clinic;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed clinic repository.
#[derive(Clone)]
pub struct PostgresClinicRepository {
    pool: PgPool,
}

impl PostgresClinicRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClinicRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClinicRow> for Clinic {
    type Error = AppError;

    fn try_from(row: ClinicRow) -> Result<Self, Self::Error> {
        Clinic::new(ClinicId::from_uuid(row.id), row.name, row.created_at)
    }
}

#[async_trait]
impl ClinicRepository for PostgresClinicRepository {
    async fn create_with_owner(&self, name: &str, owner: UserId) -> AppResult<Clinic> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        // Locking the owner row serialises concurrent bootstraps of one account.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(owner.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to lock clinic owner: {error}")))?
            .ok_or_else(|| AppError::NotFound(format!("user '{owner}' does not exist")))?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT clinic_id
            FROM users_to_clinics
            WHERE user_id = $1
            LIMIT 1
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check clinic owner membership: {error}"))
        })?;
        if let Some(clinic_id) = existing {
            return Err(AppError::Conflict(format!(
                "user '{owner}' already belongs to clinic '{clinic_id}'"
            )));
        }

        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            INSERT INTO clinics (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create clinic: {error}")))?;

        sqlx::query(
            r#"
            INSERT INTO users_to_clinics (user_id, clinic_id, permissions)
            VALUES ($1, $2, '{}')
            "#,
        )
        .bind(owner.as_uuid())
        .bind(row.id)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create clinic owner membership: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit clinic creation: {error}"))
        })?;

        Clinic::try_from(row)
    }

    async fn find_by_id(&self, clinic_id: ClinicId) -> AppResult<Option<Clinic>> {
        sqlx::query_as::<_, ClinicRow>(
            r#"
            SELECT id, name, created_at
            FROM clinics
            WHERE id = $1
            "#,
        )
        .bind(clinic_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find clinic: {error}")))?
        .map(Clinic::try_from)
        .transpose()
    }
}
