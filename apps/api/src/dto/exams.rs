use clinica_core::AppError;
use clinica_domain::{Exam, ExamKind, ExamProfile};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for exam create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/exam-request.ts"
)]
pub struct ExamRequest {
    pub description: String,
    pub validity_months: i32,
    pub secondary_validity_months: i32,
    pub price_cents: i32,
    pub requires_order: bool,
    pub previous_code: Option<String>,
    /// `admission` or `dismissal`.
    pub kind: String,
}

impl TryFrom<ExamRequest> for ExamProfile {
    type Error = AppError;

    fn try_from(value: ExamRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            description: value.description,
            validity_months: value.validity_months,
            secondary_validity_months: value.secondary_validity_months,
            price_cents: value.price_cents,
            requires_order: value.requires_order,
            previous_code: value.previous_code,
            kind: ExamKind::parse(value.kind.trim())?,
        })
    }
}

/// API representation of an exam.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/exam-response.ts"
)]
pub struct ExamResponse {
    pub exam_id: String,
    pub description: String,
    pub validity_months: i32,
    pub secondary_validity_months: i32,
    pub price_cents: i32,
    pub requires_order: bool,
    pub previous_code: Option<String>,
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Exam> for ExamResponse {
    fn from(value: Exam) -> Self {
        let profile = value.profile;

        Self {
            exam_id: value.id.to_string(),
            description: profile.description,
            validity_months: profile.validity_months,
            secondary_validity_months: profile.secondary_validity_months,
            price_cents: profile.price_cents,
            requires_order: profile.requires_order,
            previous_code: profile.previous_code,
            kind: profile.kind.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
