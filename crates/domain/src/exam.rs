use chrono::{DateTime, Utc};
use clinica_core::{AppError, AppResult, ClinicId, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::optional_text;

/// Occupational exam category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamKind {
    /// Pre-employment exam.
    Admission,
    /// Exit exam.
    Dismissal,
}

impl ExamKind {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admission => "admission",
            Self::Dismissal => "dismissal",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "admission" => Ok(Self::Admission),
            "dismissal" => Ok(Self::Dismissal),
            _ => Err(AppError::Validation(format!("unknown exam kind '{value}'"))),
        }
    }
}

/// Editable attributes of an exam in the clinic's price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamProfile {
    /// Exam description.
    pub description: String,
    /// Validity in months.
    pub validity_months: i32,
    /// Secondary validity in months, used for reduced-interval cases.
    pub secondary_validity_months: i32,
    /// Price in cents.
    pub price_cents: i32,
    /// Whether a formal request is required.
    pub requires_order: bool,
    /// Identifier in the previous system.
    pub previous_code: Option<String>,
    /// Exam category.
    pub kind: ExamKind,
}

impl ExamProfile {
    /// Trims and validates the profile.
    pub fn validated(self) -> AppResult<Self> {
        let description = NonEmptyString::new(self.description)
            .map_err(|_| AppError::Validation("exam description is required".to_owned()))?;

        for (label, value) in [
            ("validity", self.validity_months),
            ("secondary validity", self.secondary_validity_months),
            ("price", self.price_cents),
        ] {
            if value < 0 {
                return Err(AppError::Validation(format!(
                    "exam {label} must not be negative"
                )));
            }
        }

        Ok(Self {
            description: description.into(),
            previous_code: optional_text(self.previous_code),
            ..self
        })
    }
}

/// Persisted exam owned by one clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    /// Stable exam identifier.
    pub id: Uuid,
    /// Owning clinic.
    pub clinic_id: ClinicId,
    /// Exam attributes.
    pub profile: ExamProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
