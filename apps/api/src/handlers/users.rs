use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use clinica_application::{RecordSearch, USER_PAGE_SIZE, UpsertUserInput};
use clinica_core::{UserId, UserIdentity};
use clinica_domain::{Permission, PermissionSet};

use crate::dto::{
    PageResponse, UpdateUserPermissionsRequest, UpsertUserRequest, UpsertUserResponse,
    UserPermissionsResponse, UserSearchQuery, UserSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn search_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<PageResponse<UserSummaryResponse>>> {
    let search = RecordSearch::from_parts(
        query.search,
        query.page,
        None,
        query.order_by.as_deref(),
        query.order.as_deref(),
        USER_PAGE_SIZE,
    )?;

    let page = state.user_service.search_users(&user, search).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn upsert_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UpsertUserRequest>,
) -> ApiResult<(StatusCode, Json<UpsertUserResponse>)> {
    let input = UpsertUserInput::try_from(payload)?;
    let outcome = state.user_service.upsert_user(&user, input).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UpsertUserResponse::from(outcome))))
}

pub async fn get_user_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let user_id = UserId::parse(&user_id)?;
    let permissions = state
        .user_service
        .get_user_permissions(&user, user_id)
        .await?;

    Ok(Json(UserPermissionsResponse::new(user_id, &permissions)))
}

pub async fn update_user_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserPermissionsRequest>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let user_id = UserId::parse(&user_id)?;
    let permissions = PermissionSet::from_transport(&payload.permissions)?;

    let permissions = state
        .user_service
        .update_user_permissions(&user, user_id, permissions)
        .await?;

    Ok(Json(UserPermissionsResponse::new(user_id, &permissions)))
}

pub async fn grant_user_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, permission)): Path<(String, String)>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let user_id = UserId::parse(&user_id)?;
    let permission = Permission::from_transport(&permission)?;

    let permissions = state
        .user_service
        .grant_permission(&user, user_id, permission)
        .await?;

    Ok(Json(UserPermissionsResponse::new(user_id, &permissions)))
}

pub async fn revoke_user_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, permission)): Path<(String, String)>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let user_id = UserId::parse(&user_id)?;
    let permission = Permission::from_transport(&permission)?;

    let permissions = state
        .user_service
        .revoke_permission(&user, user_id, permission)
        .await?;

    Ok(Json(UserPermissionsResponse::new(user_id, &permissions)))
}
