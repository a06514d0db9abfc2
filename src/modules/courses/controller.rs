use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{
    ClickData, CourseData, CourseFilterParams, CoursesData, CreateCourseDto, UpdateCourseDto,
};

use super::service::CourseService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Courses matching the filters", body = ApiResponse<CoursesData>),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<CourseFilterParams>,
) -> Result<ApiResponse<CoursesData>, AppError> {
    let courses = CourseService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(CoursesData { courses }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = ApiResponse<CourseData>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<CourseData>, AppError> {
    let course = CourseService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(CourseData { course }))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<CourseData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin_id = admin.id))]
pub async fn create_course(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, ApiResponse<CourseData>), AppError> {
    let course = CourseService::create(
        &state.db,
        admin.id,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(CourseData { course }, "Course created"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<CourseData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<ApiResponse<CourseData>, AppError> {
    let course = CourseService::update(
        &state.db,
        id,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok(ApiResponse::with_message(CourseData { course }, "Course updated"))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_course(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    CourseService::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Course deleted"))
}

/// Public. Counts a visit to the course's video link.
#[utoipa::path(
    post,
    path = "/api/courses/{id}/click",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Click recorded", body = ApiResponse<ClickData>),
        (status = 404, description = "Course not found", body = ErrorBody)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn record_click(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<ClickData>, AppError> {
    let click_count = CourseService::record_click(&state.db, id).await?;
    Ok(ApiResponse::ok(ClickData { click_count }))
}
