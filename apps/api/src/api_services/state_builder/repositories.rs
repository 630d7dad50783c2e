use std::sync::Arc;

use clinica_application::{
    AuditRepository, ClinicRepository, MembershipRepository, RecordRepository, UserRepository,
};
use clinica_domain::{Client, Exam, Patient};
use clinica_infrastructure::{
    PostgresAuditRepository, PostgresClientRepository, PostgresClinicRepository,
    PostgresExamRepository, PostgresMembershipRepository, PostgresPatientRepository,
    PostgresUserRepository,
};
use sqlx::PgPool;

/// Port implementations shared by every service.
pub(crate) struct RepositorySet {
    pub(crate) user_repository: Arc<dyn UserRepository>,
    pub(crate) clinic_repository: Arc<dyn ClinicRepository>,
    pub(crate) membership_repository: Arc<dyn MembershipRepository>,
    pub(crate) audit_repository: Arc<dyn AuditRepository>,
    pub(crate) client_repository: Arc<dyn RecordRepository<Client>>,
    pub(crate) patient_repository: Arc<dyn RecordRepository<Patient>>,
    pub(crate) exam_repository: Arc<dyn RecordRepository<Exam>>,
}

impl RepositorySet {
    pub(crate) fn postgres(pool: &PgPool) -> Self {
        Self {
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            clinic_repository: Arc::new(PostgresClinicRepository::new(pool.clone())),
            membership_repository: Arc::new(PostgresMembershipRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
            client_repository: Arc::new(PostgresClientRepository::new(pool.clone())),
            patient_repository: Arc::new(PostgresPatientRepository::new(pool.clone())),
            exam_repository: Arc::new(PostgresExamRepository::new(pool.clone())),
        }
    }

    #[cfg(test)]
    pub(crate) fn in_memory(repository: Arc<clinica_infrastructure::InMemoryRepository>) -> Self {
        Self {
            user_repository: repository.clone(),
            clinic_repository: repository.clone(),
            membership_repository: repository.clone(),
            audit_repository: repository.clone(),
            client_repository: repository.clone(),
            patient_repository: repository.clone(),
            exam_repository: repository,
        }
    }
}
