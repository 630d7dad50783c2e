use chrono::{DateTime, NaiveDate, Utc};
use clinica_core::{AppError, AppResult, ClinicId, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::optional_text;
use crate::user::EmailAddress;

/// Biological sex recorded for occupational health exams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientSex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl PatientSex {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(AppError::Validation(format!(
                "unknown patient sex '{value}'"
            ))),
        }
    }
}

/// Editable attributes of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// CPF document number.
    pub document: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Recorded sex.
    pub sex: PatientSex,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl PatientProfile {
    /// Trims and validates the profile.
    pub fn validated(self) -> AppResult<Self> {
        let name = NonEmptyString::new(self.name)
            .map_err(|_| AppError::Validation("patient name is required".to_owned()))?;
        let email = EmailAddress::new(self.email)?;
        let phone_number = NonEmptyString::new(self.phone_number)
            .map_err(|_| AppError::Validation("patient phone number is required".to_owned()))?;
        let document: String = self
            .document
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if document.is_empty() {
            return Err(AppError::Validation(
                "patient document (CPF) is required".to_owned(),
            ));
        }

        Ok(Self {
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            document,
            birth_date: self.birth_date,
            sex: self.sex,
            notes: optional_text(self.notes),
        })
    }
}

/// Persisted patient owned by one clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Stable patient identifier.
    pub id: Uuid,
    /// Owning clinic.
    pub clinic_id: ClinicId,
    /// Patient attributes.
    pub profile: PatientProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
