use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{CreateEventDto, EventData, EventFilterParams, EventsData, UpdateEventDto};

use super::service::EventService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventFilterParams),
    responses(
        (status = 200, description = "Events matching the filters; `upcoming=true` hides past events", body = ApiResponse<EventsData>),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<EventFilterParams>,
) -> Result<ApiResponse<EventsData>, AppError> {
    let events = EventService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(EventsData { events }))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = ApiResponse<EventData>),
        (status = 404, description = "Event not found", body = ErrorBody)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<EventData>, AppError> {
    let event = EventService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(EventData { event }))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin_id = admin.id))]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, ApiResponse<EventData>), AppError> {
    let event = EventService::create(
        &state.db,
        admin.id,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(EventData { event }, "Event created"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<ApiResponse<EventData>, AppError> {
    let event = EventService::update(
        &state.db,
        id,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok(ApiResponse::with_message(EventData { event }, "Event updated"))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody)
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_event(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    EventService::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Event deleted"))
}
