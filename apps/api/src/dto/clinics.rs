use clinica_domain::Clinic;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for the first clinic of an account.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-clinic-request.ts"
)]
pub struct CreateClinicRequest {
    pub name: String,
}

/// API representation of a clinic.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/clinic-response.ts"
)]
pub struct ClinicResponse {
    pub clinic_id: String,
    pub name: String,
    pub created_at: String,
}

impl From<Clinic> for ClinicResponse {
    fn from(value: Clinic) -> Self {
        Self {
            clinic_id: value.id().to_string(),
            name: value.name().to_owned(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
