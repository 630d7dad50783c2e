use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use clinica_core::UserIdentity;
use tower_sessions::Session;

use crate::auth::read_session_principal;
use crate::dto::{ClinicResponse, CreateClinicRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/clinics - Creates the first clinic of the signed-in account.
///
/// Runs before the account has a clinic, so it resolves the bare account
/// instead of a full identity.
pub async fn create_clinic_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateClinicRequest>,
) -> ApiResult<(StatusCode, Json<ClinicResponse>)> {
    let principal = read_session_principal(&session).await?;
    let account = state.session_resolver.resolve_principal(principal).await?;

    let clinic = state
        .clinic_service
        .create_initial_clinic(&account, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(ClinicResponse::from(clinic))))
}

pub async fn current_clinic_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ClinicResponse>> {
    let clinic = state.clinic_service.current_clinic(&user).await?;
    Ok(Json(ClinicResponse::from(clinic)))
}
