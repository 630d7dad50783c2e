use clinica_application::{
    AuthorizationService, ClientService, ClinicService, ExamService, PatientService,
    SessionResolver, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session_resolver: SessionResolver,
    pub authorization_service: AuthorizationService,
    pub clinic_service: ClinicService,
    pub user_service: UserService,
    pub client_service: ClientService,
    pub patient_service: PatientService,
    pub exam_service: ExamService,
    /// Absent when the API runs over in-memory adapters.
    pub postgres_pool: Option<PgPool>,
    pub frontend_url: String,
}
