use clinica_application::SessionPrincipal;
use clinica_core::AppError;
use tower_sessions::Session;

use super::SESSION_PRINCIPAL_KEY;

pub async fn read_session_principal(
    session: &Session,
) -> Result<Option<SessionPrincipal>, AppError> {
    session
        .get::<SessionPrincipal>(SESSION_PRINCIPAL_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session principal: {error}")))
}

pub(super) async fn store_session_principal(
    session: &Session,
    principal: SessionPrincipal,
) -> Result<(), AppError> {
    // New id on every login so a pre-auth cookie cannot be fixated.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;

    session
        .insert(SESSION_PRINCIPAL_KEY, principal)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session principal: {error}")))
}
