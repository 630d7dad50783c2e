use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_application::{ClinicScope, Page, RecordRepository, RecordSearch, ScopedQuery};
use clinica_core::{AppError, AppResult, ClinicId};
use clinica_domain::{Exam, ExamKind, ExamProfile};
use sqlx::PgPool;
use uuid::Uuid;

use crate::scoped_sql::{ScopedTable, page_total};

const EXAMS: ScopedTable = ScopedTable {
    table: "exams",
    columns: "id, clinic_id, description, validity_months, secondary_validity_months, price_cents, requires_order, previous_code, kind, created_at, updated_at",
    name_column: "description",
    search_columns: &["description"],
};

/// PostgreSQL-backed exam repository.
#[derive(Clone)]
pub struct PostgresExamRepository {
    pool: PgPool,
}

impl PostgresExamRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExamRow {
    id: Uuid,
    clinic_id: Uuid,
    description: String,
    validity_months: i32,
    secondary_validity_months: i32,
    price_cents: i32,
    requires_order: bool,
    previous_code: Option<String>,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExamRow> for Exam {
    type Error = AppError;

    fn try_from(row: ExamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            clinic_id: ClinicId::from_uuid(row.clinic_id),
            profile: ExamProfile {
                description: row.description,
                validity_months: row.validity_months,
                secondary_validity_months: row.secondary_validity_months,
                price_cents: row.price_cents,
                requires_order: row.requires_order,
                previous_code: row.previous_code,
                kind: ExamKind::parse(row.kind.as_str())?,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl RecordRepository<Exam> for PostgresExamRepository {
    async fn create(&self, scope: &ClinicScope, profile: ExamProfile) -> AppResult<Exam> {
        sqlx::query_as::<_, ExamRow>(&format!(
            r#"
            INSERT INTO exams (
                id, clinic_id, description, validity_months, secondary_validity_months,
                price_cents, requires_order, previous_code, kind
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            EXAMS.columns
        ))
        .bind(Uuid::new_v4())
        .bind(scope.clinic_id().as_uuid())
        .bind(profile.description)
        .bind(profile.validity_months)
        .bind(profile.secondary_validity_months)
        .bind(profile.price_cents)
        .bind(profile.requires_order)
        .bind(profile.previous_code)
        .bind(profile.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create exam: {error}")))
        .and_then(Exam::try_from)
    }

    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: ExamProfile,
    ) -> AppResult<Option<Exam>> {
        sqlx::query_as::<_, ExamRow>(&format!(
            r#"
            UPDATE exams
            SET description = $3, validity_months = $4, secondary_validity_months = $5,
                price_cents = $6, requires_order = $7, previous_code = $8, kind = $9,
                updated_at = now()
            WHERE clinic_id = $1 AND id = $2
            RETURNING {}
            "#,
            EXAMS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .bind(profile.description)
        .bind(profile.validity_months)
        .bind(profile.secondary_validity_months)
        .bind(profile.price_cents)
        .bind(profile.requires_order)
        .bind(profile.previous_code)
        .bind(profile.kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update exam: {error}")))?
        .map(Exam::try_from)
        .transpose()
    }

    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<Exam>> {
        sqlx::query_as::<_, ExamRow>(&format!(
            "SELECT {} FROM exams WHERE clinic_id = $1 AND id = $2",
            EXAMS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find exam: {error}")))?
        .map(Exam::try_from)
        .transpose()
    }

    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<Exam>> {
        let total = EXAMS
            .count(&query)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count exams: {error}")))?;

        let rows = EXAMS
            .select_page(&query)?
            .build_query_as::<ExamRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list exams: {error}")))?;

        let items = rows
            .into_iter()
            .map(Exam::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, query.filter(), page_total(total)))
    }

    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM exams WHERE clinic_id = $1 AND id = $2")
            .bind(scope.clinic_id().as_uuid())
            .bind(record_id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete exam: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
