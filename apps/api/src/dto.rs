mod auth;
mod clients;
mod clinics;
mod common;
mod exams;
mod patients;
mod users;

pub use auth::{AuthLoginRequest, AuthLoginResponse, MeResponse};
pub use clients::{AddressPayload, ClientRequest, ClientResponse};
pub use clinics::{ClinicResponse, CreateClinicRequest};
pub use common::{
    HealthDependencyStatus, HealthResponse, PageResponse, PermissionResponse, RecordListQuery,
};
pub use exams::{ExamRequest, ExamResponse};
pub use patients::{PatientRequest, PatientResponse};
pub use users::{
    UpdateUserPermissionsRequest, UpsertUserRequest, UpsertUserResponse, UserPermissionsResponse,
    UserSearchQuery, UserSummaryResponse,
};

#[cfg(test)]
mod tests {
    use super::{
        AddressPayload, AuthLoginRequest, AuthLoginResponse, ClientRequest, ClientResponse,
        ClinicResponse, CreateClinicRequest, ExamRequest, ExamResponse, HealthDependencyStatus,
        HealthResponse, MeResponse, PatientRequest, PatientResponse, PermissionResponse,
        UpdateUserPermissionsRequest, UpsertUserRequest, UpsertUserResponse,
        UserPermissionsResponse, UserSummaryResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AuthLoginRequest::export(&config)?;
        AuthLoginResponse::export(&config)?;
        MeResponse::export(&config)?;
        CreateClinicRequest::export(&config)?;
        ClinicResponse::export(&config)?;
        PermissionResponse::export(&config)?;
        UpsertUserRequest::export(&config)?;
        UpsertUserResponse::export(&config)?;
        UserSummaryResponse::export(&config)?;
        UserPermissionsResponse::export(&config)?;
        UpdateUserPermissionsRequest::export(&config)?;
        AddressPayload::export(&config)?;
        ClientRequest::export(&config)?;
        ClientResponse::export(&config)?;
        PatientRequest::export(&config)?;
        PatientResponse::export(&config)?;
        ExamRequest::export(&config)?;
        ExamResponse::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
