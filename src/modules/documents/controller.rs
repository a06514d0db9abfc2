use axum::{extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{
    CreateDocumentDto, DocumentData, DocumentFilterParams, DocumentsData, UpdateDocumentDto,
};

use super::service::DocumentService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentFilterParams),
    responses(
        (status = 200, description = "Documents matching the filters", body = ApiResponse<DocumentsData>),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
    ValidatedQuery(filters): ValidatedQuery<DocumentFilterParams>,
) -> Result<ApiResponse<DocumentsData>, AppError> {
    let documents = DocumentService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(DocumentsData { documents }))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = ApiResponse<DocumentData>),
        (status = 404, description = "Document not found", body = ErrorBody)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn get_document(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<DocumentData>, AppError> {
    let document = DocumentService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(DocumentData { document }))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentDto,
    responses(
        (status = 201, description = "Document created", body = ApiResponse<DocumentData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_document(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<CreateDocumentDto>,
) -> Result<(StatusCode, ApiResponse<DocumentData>), AppError> {
    let document = DocumentService::create(
        &state.db,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(DocumentData { document }, "Document created"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document ID")),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated", body = ApiResponse<DocumentData>),
        (status = 400, description = "Validation failed or invalid reference", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Document not found", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_document(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateDocumentDto>,
) -> Result<ApiResponse<DocumentData>, AppError> {
    let document = DocumentService::update(
        &state.db,
        id,
        dto,
        state.database_config.transaction_timeout,
    )
    .await?;

    Ok(ApiResponse::with_message(DocumentData { document }, "Document updated"))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Document not found", body = ErrorBody)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_document(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    DocumentService::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Document deleted"))
}
