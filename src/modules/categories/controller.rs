use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{CategoriesData, CategoryData, CreateCategoryDto, UpdateCategoryDto};

use super::service::CategoryService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories with usage counts", body = ApiResponse<CategoriesData>)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<CategoriesData>, AppError> {
    let categories = CategoryService::list(&state.db).await?;
    Ok(ApiResponse::ok(CategoriesData { categories }))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryData>),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<CategoryData>, AppError> {
    let category = CategoryService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(CategoryData { category }))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryData>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
) -> Result<(StatusCode, ApiResponse<CategoryData>), AppError> {
    let category = CategoryService::create(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(CategoryData { category }, "Category created"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryData>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateCategoryDto>,
) -> Result<ApiResponse<CategoryData>, AppError> {
    let category = CategoryService::update(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message(
        CategoryData { category },
        "Category updated",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category is in use", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "Categories",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    CategoryService::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Category deleted"))
}
