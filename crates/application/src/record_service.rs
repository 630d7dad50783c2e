use std::marker::PhantomData;
use std::sync::Arc;

use clinica_core::{AppError, AppResult, UserIdentity};
use clinica_domain::{Client, Exam, Patient};
use tracing::info;
use uuid::Uuid;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, Page, RecordRepository, RecordSearch,
    TenantRecord,
};

/// Clinic-scoped CRUD for clients.
pub type ClientService = RecordService<Client>;
/// Clinic-scoped CRUD for patients.
pub type PatientService = RecordService<Patient>;
/// Clinic-scoped CRUD for exams.
pub type ExamService = RecordService<Exam>;

/// Application service for one kind of clinic-owned record.
///
/// Every operation passes the gate with the record's permission and uses the
/// returned scope for storage access.
pub struct RecordService<R: TenantRecord> {
    authorization_service: AuthorizationService,
    repository: Arc<dyn RecordRepository<R>>,
    audit_repository: Arc<dyn AuditRepository>,
    _record: PhantomData<fn() -> R>,
}

impl<R: TenantRecord> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            authorization_service: self.authorization_service.clone(),
            repository: self.repository.clone(),
            audit_repository: self.audit_repository.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: TenantRecord> RecordService<R> {
    /// Creates a new record service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn RecordRepository<R>>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
            _record: PhantomData,
        }
    }

    /// Creates a record, or updates one of the actor's clinic when `record_id` is set.
    ///
    /// An id unknown in the actor's clinic is `NotFound`, even if another clinic owns it.
    pub async fn upsert(
        &self,
        actor: &UserIdentity,
        record_id: Option<Uuid>,
        profile: R::Profile,
    ) -> AppResult<R> {
        let scope = self
            .authorization_service
            .require_permission(actor, R::PERMISSION)
            .await?;
        let profile = R::validate(profile)?;

        match record_id {
            None => self.repository.create(&scope, profile).await,
            Some(record_id) => self
                .repository
                .update(&scope, record_id, profile)
                .await?
                .ok_or_else(|| not_found::<R>(record_id)),
        }
    }

    /// Returns one record of the actor's clinic.
    pub async fn get(&self, actor: &UserIdentity, record_id: Uuid) -> AppResult<R> {
        let scope = self
            .authorization_service
            .require_permission(actor, R::PERMISSION)
            .await?;

        self.repository
            .find(&scope, record_id)
            .await?
            .ok_or_else(|| not_found::<R>(record_id))
    }

    /// Lists records of the actor's clinic.
    pub async fn list(&self, actor: &UserIdentity, search: RecordSearch) -> AppResult<Page<R>> {
        let scope = self
            .authorization_service
            .require_permission(actor, R::PERMISSION)
            .await?;

        self.repository.list(scope.query(search)).await
    }

    /// Deletes a record of the actor's clinic.
    pub async fn delete(&self, actor: &UserIdentity, record_id: Uuid) -> AppResult<()> {
        let scope = self
            .authorization_service
            .require_permission(actor, R::PERMISSION)
            .await?;

        if !self.repository.delete(&scope, record_id).await? {
            return Err(not_found::<R>(record_id));
        }

        self.audit_repository
            .append_event(AuditEvent {
                clinic_id: scope.clinic_id(),
                actor_user_id: actor.user_id(),
                action: R::DELETED_ACTION,
                resource_type: R::RESOURCE_TYPE.to_owned(),
                resource_id: record_id.to_string(),
                detail: None,
            })
            .await?;

        info!(
            user_id = %actor.user_id(),
            clinic_id = %scope.clinic_id(),
            resource_type = R::RESOURCE_TYPE,
            %record_id,
            "record deleted"
        );
        Ok(())
    }

    /// Default page size for list requests of this record type.
    #[must_use]
    pub fn default_page_size(&self) -> u32 {
        R::DEFAULT_PAGE_SIZE
    }
}

fn not_found<R: TenantRecord>(record_id: Uuid) -> AppError {
    AppError::NotFound(format!(
        "{} '{record_id}' does not exist",
        R::RESOURCE_TYPE
    ))
}

#[cfg(test)]
mod tests;
