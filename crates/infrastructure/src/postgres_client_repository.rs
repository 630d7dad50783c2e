use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_application::{ClinicScope, Page, RecordRepository, RecordSearch, ScopedQuery};
use clinica_core::{AppError, AppResult, ClinicId};
use clinica_domain::{Address, Client, ClientProfile, PersonKind};
use sqlx::PgPool;
use uuid::Uuid;

use crate::scoped_sql::{ScopedTable, page_total};

const CLIENTS: ScopedTable = ScopedTable {
    table: "clients",
    columns: "id, clinic_id, trade_name, person_kind, document, email, phone, mobile, street, number, complement, district, city, state, postal_code, active, notes, previous_code, created_at, updated_at",
    name_column: "trade_name",
    search_columns: &["trade_name", "document"],
};

/// PostgreSQL-backed client repository.
#[derive(Clone)]
pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    clinic_id: Uuid,
    trade_name: String,
    person_kind: Option<String>,
    document: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    mobile: Option<String>,
    street: Option<String>,
    number: Option<String>,
    complement: Option<String>,
    district: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    active: bool,
    notes: Option<String>,
    previous_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = AppError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            clinic_id: ClinicId::from_uuid(row.clinic_id),
            profile: ClientProfile {
                trade_name: row.trade_name,
                person_kind: row.person_kind.as_deref().map(PersonKind::parse).transpose()?,
                document: row.document,
                email: row.email,
                phone: row.phone,
                mobile: row.mobile,
                address: Address {
                    street: row.street,
                    number: row.number,
                    complement: row.complement,
                    district: row.district,
                    city: row.city,
                    state: row.state,
                    postal_code: row.postal_code,
                },
                active: row.active,
                notes: row.notes,
                previous_code: row.previous_code,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl RecordRepository<Client> for PostgresClientRepository {
    async fn create(&self, scope: &ClinicScope, profile: ClientProfile) -> AppResult<Client> {
        let address = profile.address;
        sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            INSERT INTO clients (
                id, clinic_id, trade_name, person_kind, document, email, phone, mobile,
                street, number, complement, district, city, state, postal_code,
                active, notes, previous_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            CLIENTS.columns
        ))
        .bind(Uuid::new_v4())
        .bind(scope.clinic_id().as_uuid())
        .bind(profile.trade_name)
        .bind(profile.person_kind.map(|kind| kind.as_str()))
        .bind(profile.document)
        .bind(profile.email)
        .bind(profile.phone)
        .bind(profile.mobile)
        .bind(address.street)
        .bind(address.number)
        .bind(address.complement)
        .bind(address.district)
        .bind(address.city)
        .bind(address.state)
        .bind(address.postal_code)
        .bind(profile.active)
        .bind(profile.notes)
        .bind(profile.previous_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create client: {error}")))
        .and_then(Client::try_from)
    }

    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: ClientProfile,
    ) -> AppResult<Option<Client>> {
        let address = profile.address;
        sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            UPDATE clients
            SET trade_name = $3, person_kind = $4, document = $5, email = $6, phone = $7,
                mobile = $8, street = $9, number = $10, complement = $11, district = $12,
                city = $13, state = $14, postal_code = $15, active = $16, notes = $17,
                previous_code = $18, updated_at = now()
            WHERE clinic_id = $1 AND id = $2
            RETURNING {}
            "#,
            CLIENTS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .bind(profile.trade_name)
        .bind(profile.person_kind.map(|kind| kind.as_str()))
        .bind(profile.document)
        .bind(profile.email)
        .bind(profile.phone)
        .bind(profile.mobile)
        .bind(address.street)
        .bind(address.number)
        .bind(address.complement)
        .bind(address.district)
        .bind(address.city)
        .bind(address.state)
        .bind(address.postal_code)
        .bind(profile.active)
        .bind(profile.notes)
        .bind(profile.previous_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update client: {error}")))?
        .map(Client::try_from)
        .transpose()
    }

    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE clinic_id = $1 AND id = $2",
            CLIENTS.columns
        ))
        .bind(scope.clinic_id().as_uuid())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find client: {error}")))?
        .map(Client::try_from)
        .transpose()
    }

    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<Client>> {
        let total = CLIENTS
            .count(&query)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count clients: {error}")))?;

        let rows = CLIENTS
            .select_page(&query)?
            .build_query_as::<ClientRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list clients: {error}")))?;

        let items = rows
            .into_iter()
            .map(Client::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, query.filter(), page_total(total)))
    }

    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE clinic_id = $1 AND id = $2")
            .bind(scope.clinic_id().as_uuid())
            .bind(record_id)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete client: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
