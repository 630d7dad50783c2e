use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use clinica_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::MeResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::read_session_principal;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    if let Some(principal) = read_session_principal(&session).await? {
        info!(user_id = %principal.user_id, "user logged out");
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MeResponse>> {
    let clinic = state.clinic_service.current_clinic(&user).await?;
    let permissions = state.authorization_service.effective_permissions(&user).await?;

    Ok(Json(MeResponse::new(&user, &clinic, &permissions)))
}
