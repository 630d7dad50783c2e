use axum::Json;
use clinica_domain::Permission;

use crate::dto::PermissionResponse;

pub async fn list_permissions_handler() -> Json<Vec<PermissionResponse>> {
    Json(
        Permission::all()
            .iter()
            .copied()
            .map(PermissionResponse::from)
            .collect(),
    )
}
