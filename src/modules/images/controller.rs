use axum::{
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{ImageData, ImagesData};

use super::service::{ImageService, UploadedImage};
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::ValidatedPath;

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
pub struct ImageUploadForm {
    /// PNG, JPEG, WebP or GIF
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    pub alt_text: Option<String>,
}

fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::bad_request(anyhow::anyhow!(
            "File exceeds maximum size of {} bytes",
            max_bytes
        ));
    }
    AppError::validation(vec![format!("image: {}", e.body_text())])
}

#[utoipa::path(
    get,
    path = "/api/images",
    responses(
        (status = 200, description = "All uploaded images", body = ApiResponse<ImagesData>)
    ),
    tag = "Images"
)]
#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<ApiResponse<ImagesData>, AppError> {
    let images = ImageService::list(&state.db).await?;
    Ok(ApiResponse::ok(ImagesData { images }))
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<ImageData>),
        (status = 400, description = "Missing, empty, oversized or unsupported file", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    tag = "Images",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, multipart), fields(admin_id = admin.id))]
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, ApiResponse<ImageData>), AppError> {
    let mut multipart = multipart
        .map_err(|rejection| AppError::validation(vec![format!("image: {}", rejection.body_text())]))?;
    let max_bytes = state.upload_config.max_bytes;
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut alt_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        match field.name() {
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            Some("alt_text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                alt_text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or_else(|| AppError::validation(vec!["image: is required".to_string()]))?;

    let upload = UploadedImage {
        filename,
        content_type,
        bytes,
        alt_text,
    };
    let image = ImageService::upload(&state.db, &state.storage, admin.id, upload).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(ImageData { image }, "Image uploaded"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image and file removed"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Image not found", body = ErrorBody)
    ),
    tag = "Images",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_image(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<Value>, AppError> {
    ImageService::delete(&state.db, &state.storage, id).await?;
    Ok(ApiResponse::with_message(Value::Null, "Image deleted"))
}
