use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{CreateTagDto, TagData, TagsData, UpdateTagDto};

use super::service::TagService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "All tags with usage counts", body = ApiResponse<TagsData>)
    ),
    tag = "Tags"
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<ApiResponse<TagsData>, AppError> {
    let tags = TagService::list(&state.db).await?;
    Ok(ApiResponse::ok(TagsData { tags }))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = ApiResponse<TagData>),
        (status = 404, description = "Tag not found", body = ErrorBody)
    ),
    tag = "Tags"
)]
#[instrument(skip(state))]
pub async fn get_tag(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<TagData>, AppError> {
    let tag = TagService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(TagData { tag }))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagDto,
    responses(
        (status = 201, description = "Tag created", body = ApiResponse<TagData>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Tags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_tag(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTagDto>,
) -> Result<(StatusCode, ApiResponse<TagData>), AppError> {
    let tag = TagService::create(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(TagData { tag }, "Tag created"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = UpdateTagDto,
    responses(
        (status = 200, description = "Tag updated", body = ApiResponse<TagData>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Tag not found", body = ErrorBody)
    ),
    tag = "Tags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_tag(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateTagDto>,
) -> Result<ApiResponse<TagData>, AppError> {
    let tag = TagService::update(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message(TagData { tag }, "Tag updated"))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Tag not found", body = ErrorBody)
    ),
    tag = "Tags",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_tag(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    TagService::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Tag deleted"))
}
