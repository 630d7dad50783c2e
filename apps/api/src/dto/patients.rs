use chrono::NaiveDate;
use clinica_core::AppError;
use clinica_domain::{Patient, PatientProfile, PatientSex};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for patient create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/patient-request.ts"
)]
pub struct PatientRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub document: String,
    /// ISO date, `YYYY-MM-DD`.
    pub birth_date: String,
    /// `male` or `female`.
    pub sex: String,
    pub notes: Option<String>,
}

impl TryFrom<PatientRequest> for PatientProfile {
    type Error = AppError;

    fn try_from(value: PatientRequest) -> Result<Self, Self::Error> {
        let birth_date = NaiveDate::parse_from_str(value.birth_date.trim(), "%Y-%m-%d")
            .map_err(|error| {
                AppError::Validation(format!(
                    "invalid birth date '{}': {error}",
                    value.birth_date
                ))
            })?;

        Ok(Self {
            name: value.name,
            email: value.email,
            phone_number: value.phone_number,
            document: value.document,
            birth_date,
            sex: PatientSex::parse(value.sex.trim())?,
            notes: value.notes,
        })
    }
}

/// API representation of a patient.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/patient-response.ts"
)]
pub struct PatientResponse {
    pub patient_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub document: String,
    pub birth_date: String,
    pub sex: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for PatientResponse {
    fn from(value: Patient) -> Self {
        let profile = value.profile;

        Self {
            patient_id: value.id.to_string(),
            name: profile.name,
            email: profile.email,
            phone_number: profile.phone_number,
            document: profile.document,
            birth_date: profile.birth_date.format("%Y-%m-%d").to_string(),
            sex: profile.sex.as_str().to_owned(),
            notes: profile.notes,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clinica_core::AppError;
    use clinica_domain::PatientProfile;

    use super::PatientRequest;

    fn request(birth_date: &str, sex: &str) -> PatientRequest {
        PatientRequest {
            name: "Ana".to_owned(),
            email: "ana@example.com".to_owned(),
            phone_number: "51 99999-0000".to_owned(),
            document: "12345678909".to_owned(),
            birth_date: birth_date.to_owned(),
            sex: sex.to_owned(),
            notes: None,
        }
    }

    #[test]
    fn birth_date_and_sex_are_parsed() {
        let profile = PatientProfile::try_from(request("1990-04-12", "female"));
        assert_eq!(
            profile
                .map(|value| value.birth_date.to_string())
                .ok()
                .as_deref(),
            Some("1990-04-12")
        );
    }

    #[test]
    fn malformed_birth_date_is_a_validation_error() {
        assert!(matches!(
            PatientProfile::try_from(request("12/04/1990", "female")),
            Err(AppError::Validation(_))
        ));
    }
}
