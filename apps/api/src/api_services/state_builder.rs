use std::sync::Arc;

use clinica_application::{
    AuthorizationService, ClinicService, PasswordHasher, RecordService, SessionResolver,
    UserService,
};
use clinica_infrastructure::Argon2PasswordHasher;
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;

pub(crate) use repositories::RepositorySet;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let repositories = RepositorySet::postgres(&pool);

    assemble_app_state(
        repositories,
        Arc::new(Argon2PasswordHasher::new()),
        Some(pool),
        config.frontend_url.clone(),
    )
}

/// Wires services over an arbitrary set of repository adapters.
pub(crate) fn assemble_app_state(
    repositories: RepositorySet,
    password_hasher: Arc<dyn PasswordHasher>,
    postgres_pool: Option<PgPool>,
    frontend_url: String,
) -> AppState {
    let authorization_service =
        AuthorizationService::new(repositories.membership_repository.clone());

    AppState {
        session_resolver: SessionResolver::new(
            repositories.user_repository.clone(),
            repositories.membership_repository.clone(),
        ),
        clinic_service: ClinicService::new(
            repositories.clinic_repository,
            repositories.membership_repository.clone(),
            repositories.audit_repository.clone(),
        ),
        user_service: UserService::new(
            authorization_service.clone(),
            repositories.user_repository,
            repositories.membership_repository,
            password_hasher,
            repositories.audit_repository.clone(),
        ),
        client_service: RecordService::new(
            authorization_service.clone(),
            repositories.client_repository,
            repositories.audit_repository.clone(),
        ),
        patient_service: RecordService::new(
            authorization_service.clone(),
            repositories.patient_repository,
            repositories.audit_repository.clone(),
        ),
        exam_service: RecordService::new(
            authorization_service.clone(),
            repositories.exam_repository,
            repositories.audit_repository,
        ),
        authorization_service,
        postgres_pool,
        frontend_url,
    }
}
