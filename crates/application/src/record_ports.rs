use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinica_core::{AppResult, ClinicId};
use clinica_domain::{
    AuditAction, Client, ClientProfile, Exam, ExamProfile, Patient, PatientProfile, Permission,
};
use uuid::Uuid;

use crate::{ClinicScope, Page, RecordSearch, ScopedQuery};

/// Record owned by exactly one clinic and guarded by one catalog permission.
pub trait TenantRecord: Clone + Send + Sync + 'static {
    /// Editable attributes accepted on upsert.
    type Profile: Clone + Send + Sync + 'static;

    /// Permission required for every operation on this record type.
    const PERMISSION: Permission;
    /// Resource type label used in audit events and messages.
    const RESOURCE_TYPE: &'static str;
    /// Audit action appended on delete.
    const DELETED_ACTION: AuditAction;
    /// Page size used when the caller does not provide one.
    const DEFAULT_PAGE_SIZE: u32;

    /// Trims and validates an incoming profile.
    fn validate(profile: Self::Profile) -> AppResult<Self::Profile>;

    /// Stable record identifier.
    fn id(&self) -> Uuid;

    /// Owning clinic.
    fn clinic_id(&self) -> ClinicId;

    /// Primary display column used for search and name ordering.
    fn display_name(&self) -> &str;

    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Repository port for clinic-owned records.
///
/// Every method takes the gate-issued scope; rows outside it are invisible.
#[async_trait]
pub trait RecordRepository<R: TenantRecord>: Send + Sync {
    /// Inserts a record into the scoped clinic.
    async fn create(&self, scope: &ClinicScope, profile: R::Profile) -> AppResult<R>;

    /// Updates a record of the scoped clinic. Returns `None` when no such row exists there.
    async fn update(
        &self,
        scope: &ClinicScope,
        record_id: Uuid,
        profile: R::Profile,
    ) -> AppResult<Option<R>>;

    /// Finds a record of the scoped clinic.
    async fn find(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<Option<R>>;

    /// Lists records of the scoped clinic matching the filter.
    async fn list(&self, query: ScopedQuery<RecordSearch>) -> AppResult<Page<R>>;

    /// Deletes a record of the scoped clinic. Returns `false` when nothing was deleted.
    async fn delete(&self, scope: &ClinicScope, record_id: Uuid) -> AppResult<bool>;
}

impl TenantRecord for Client {
    type Profile = ClientProfile;

    const PERMISSION: Permission = Permission::ManageClients;
    const RESOURCE_TYPE: &'static str = "client";
    const DELETED_ACTION: AuditAction = AuditAction::ClientDeleted;
    const DEFAULT_PAGE_SIZE: u32 = 10;

    fn validate(profile: Self::Profile) -> AppResult<Self::Profile> {
        profile.validated()
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }

    fn display_name(&self) -> &str {
        &self.profile.trade_name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl TenantRecord for Patient {
    type Profile = PatientProfile;

    const PERMISSION: Permission = Permission::ManagePatients;
    const RESOURCE_TYPE: &'static str = "patient";
    const DELETED_ACTION: AuditAction = AuditAction::PatientDeleted;
    const DEFAULT_PAGE_SIZE: u32 = 50;

    fn validate(profile: Self::Profile) -> AppResult<Self::Profile> {
        profile.validated()
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }

    fn display_name(&self) -> &str {
        &self.profile.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl TenantRecord for Exam {
    type Profile = ExamProfile;

    const PERMISSION: Permission = Permission::ManageExams;
    const RESOURCE_TYPE: &'static str = "exam";
    const DELETED_ACTION: AuditAction = AuditAction::ExamDeleted;
    const DEFAULT_PAGE_SIZE: u32 = 50;

    fn validate(profile: Self::Profile) -> AppResult<Self::Profile> {
        profile.validated()
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn clinic_id(&self) -> ClinicId {
        self.clinic_id
    }

    fn display_name(&self) -> &str {
        &self.profile.description
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
