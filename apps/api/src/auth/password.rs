use axum::Json;
use axum::extract::State;
use clinica_application::{AuthOutcome, SessionPrincipal};
use clinica_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{AuthLoginRequest, AuthLoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::store_session_principal;

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AuthLoginResponse>> {
    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let AuthOutcome::Authenticated(user) = outcome else {
        return Err(AppError::Unauthenticated("invalid email or password".to_owned()).into());
    };

    let principal = SessionPrincipal::issue(user.id);
    store_session_principal(&session, principal).await?;

    let has_clinic = match state.session_resolver.resolve(Some(principal)).await {
        Ok(_) => true,
        Err(AppError::Unauthenticated(_)) => false,
        Err(error) => return Err(error.into()),
    };

    info!(user_id = %user.id, has_clinic, "user logged in");

    Ok(Json(AuthLoginResponse {
        user_id: user.id.to_string(),
        role: user.role.as_str().to_owned(),
        has_clinic,
    }))
}
