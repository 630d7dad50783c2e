//! CRUD endpoints shared by clients, patients and exams.
//!
//! Each record kind plugs in through [`RecordEndpoint`]; routes pick the kind
//! with a turbofish, e.g. `get(list_records_handler::<Client>)`.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use clinica_application::{RecordSearch, RecordService, TenantRecord};
use clinica_core::{AppError, AppResult, UserIdentity};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::dto::{PageResponse, RecordListQuery};
use crate::error::ApiResult;
use crate::state::AppState;

mod endpoints;

/// Binds a record kind to its transport types and service.
pub trait RecordEndpoint: TenantRecord {
    /// Create and update payload.
    type Request: DeserializeOwned + Send + 'static;
    /// Response body for one record.
    type Response: Serialize + From<Self> + Send + 'static;

    /// Returns the service handling this record kind.
    fn service(state: &AppState) -> &RecordService<Self>;

    /// Converts the payload into the domain profile.
    fn profile(request: Self::Request) -> AppResult<Self::Profile>;
}

pub async fn list_records_handler<R: RecordEndpoint>(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<RecordListQuery>,
) -> ApiResult<Json<PageResponse<R::Response>>> {
    let service = R::service(&state);
    let search = RecordSearch::from_parts(
        query.search,
        query.page,
        query.limit,
        query.order_by.as_deref(),
        query.order.as_deref(),
        service.default_page_size(),
    )?;

    let page = service.list(&user, search).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn create_record_handler<R: RecordEndpoint>(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<R::Request>,
) -> ApiResult<(StatusCode, Json<R::Response>)> {
    let profile = R::profile(payload)?;
    let record = R::service(&state).upsert(&user, None, profile).await?;

    Ok((StatusCode::CREATED, Json(R::Response::from(record))))
}

pub async fn get_record_handler<R: RecordEndpoint>(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<R::Response>> {
    let record_id = parse_record_id::<R>(&record_id)?;
    let record = R::service(&state).get(&user, record_id).await?;

    Ok(Json(R::Response::from(record)))
}

pub async fn update_record_handler<R: RecordEndpoint>(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
    Json(payload): Json<R::Request>,
) -> ApiResult<Json<R::Response>> {
    let record_id = parse_record_id::<R>(&record_id)?;
    let profile = R::profile(payload)?;
    let record = R::service(&state)
        .upsert(&user, Some(record_id), profile)
        .await?;

    Ok(Json(R::Response::from(record)))
}

pub async fn delete_record_handler<R: RecordEndpoint>(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
) -> ApiResult<StatusCode> {
    let record_id = parse_record_id::<R>(&record_id)?;
    R::service(&state).delete(&user, record_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_record_id<R: TenantRecord>(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|error| {
        AppError::Validation(format!(
            "invalid {} id '{value}': {error}",
            R::RESOURCE_TYPE
        ))
    })
}
