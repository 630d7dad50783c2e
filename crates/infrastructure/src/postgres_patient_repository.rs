use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clinica_application::{ClinicScope, Page, RecordRepository, RecordSearch, ScopedQuery};
use clinica_core::{AppError, AppResult, ClinicId};
use clinica_domain::{Patient, PatientProfile, PatientSex};
use sqlx::PgPool;
use uuid::Uuid;

use crate::scoped_sql::{ScopedTable, page_total};

const PATIENTS: ScopedTable = ScopedTable {
    table: "patients",
    columns: "id, clinic_id, name, email, phone_number, document, birth_date, sex, notes, created_at, updated_at",
    name_column: "name",
    search_columns: &["name", "document"],
};

/// PostgreSQL-backed patient repository.
#[derive(Clone)]
pub struct PostgresPatientRepository {
    pool: PgPool,
}

impl PostgresPatientRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PatientRow {
    id: Uuid,
    clinic_id: Uuid,
    name: String,
    email: String,
    phone_number: String,
    document: String,
    birth_date: NaiveDate,
    sex: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = AppError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            clinic_id: ClinicId::from_uuid(row.clinic_id),
            profile: PatientProfile {
                name: row.name,
                email: row.email,
                phone_number: row.phone_number,
                document: row.document,
                birth_date: row.birth_date,
                sex: PatientSex::parse(row.sex.as_str())?,
                notes: row.notes,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl RecordRepository<Patient> for PostgresPatientRepository {
    async fn create(&self, scope: &ClinicScope, profile: PatientProfile) -> AppResult<Patient> {
        sqlx::query_as::<_, PatientRow>(&format!(
            r#"
            INSERT INTO patients (
                id, clinic_id, name, email, phone_number, document, birth_date, sex, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PATIENTS.columns
        ))
        .bind(Uuid::new_v4())
        .bind(scope.clinic_id().as_uuid())
        .bind(profile.name)
        .bind(profile.email)
        .bind(profile.phone_number)
        .bind(profile.document)
        .bind(profile.birth_date)
        .bind(profile.sex.as_str())
        .bind(profile.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create patient: {error}")))
        .and_then(Patient::try_from)
    }

    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: PatientProfile,
    ) -> AppResult<Option<Patient>> {
        sqlx::query_as::<_, PatientRow>(&format!(
            r#"
            UPDATE patients
            SET name = $3, email = $4, phone_number = $5, document = $6, birth_date = $7,
                sex = $8, notes = $9, updated_at = now()
            WHERE clinic_id = $1 AND id = $2
            RETURNING {}
            "#,
            PATIENTS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .bind(profile.name)
        .bind(profile.email)
        .bind(profile.phone_number)
        .bind(profile.document)
        .bind(profile.birth_date)
        .bind(profile.sex.as_str())
        .bind(profile.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update patient: {error}")))?
        .map(Patient::try_from)
        .transpose()
    }

    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<Patient>> {
        sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {} FROM patients WHERE clinic_id = $1 AND id = $2",
            PATIENTS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find patient: {error}")))?
        .map(Patient::try_from)
        .transpose()
    }

    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<Patient>> {
        let total = PATIENTS
            .count(&query)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count patients: {error}")))?;

        let rows = PATIENTS
            .select_page(&query)?
            .build_query_as::<PatientRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list patients: {error}")))?;

        let items = rows
            .into_iter()
            .map(Patient::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, query.filter(), page_total(total)))
    }

    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE clinic_id = $1 AND id = $2")
            .bind(scope.clinic_id().as_uuid())
            .bind(record_id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete patient: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
