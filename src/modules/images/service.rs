use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use lescracks_core::AppError;
use lescracks_core::file_storage::{FileStorage, StorageError, image_extension};
use lescracks_models::Image;

use crate::metrics::track_image_uploaded;

/// A file taken out of the multipart body, not yet stored.
#[derive(Debug)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub alt_text: Option<String>,
}

fn storage_error(e: StorageError) -> AppError {
    if e.is_rejection() {
        AppError::bad_request(anyhow!(e.to_string()))
    } else {
        AppError::internal(e)
    }
}

const IMAGE_COLUMNS: &str =
    "id, filename, storage_key, url, mime_type, size_bytes, alt_text, uploaded_by, created_at";

pub struct ImageService;

impl ImageService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<Image>, AppError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at DESC, id DESC");
        let images = sqlx::query_as::<_, Image>(&sql).fetch_all(db).await?;
        Ok(images)
    }

    /// Stores the file, then records it. The file is removed again if the insert fails.
    #[instrument(skip(db, storage, upload), fields(filename = %upload.filename, bytes = upload.bytes.len()))]
    pub async fn upload<S: FileStorage>(
        db: &PgPool,
        storage: &S,
        admin_id: i32,
        upload: UploadedImage,
    ) -> Result<Image, AppError> {
        if upload.bytes.is_empty() {
            return Err(AppError::validation(vec!["image: file is empty".to_string()]));
        }

        let extension = image_extension(&upload.content_type).map_err(storage_error)?;
        let key = format!("images/{}.{}", Uuid::new_v4(), extension);

        let key = storage
            .save(&key, &upload.bytes)
            .await
            .map_err(storage_error)?;
        let url = storage.url_for(&key).map_err(storage_error)?;

        let sql = format!(
            "INSERT INTO images (filename, storage_key, url, mime_type, size_bytes, alt_text, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {IMAGE_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Image>(&sql)
            .bind(&upload.filename)
            .bind(&key)
            .bind(&url)
            .bind(upload.content_type.split(';').next().unwrap_or_default().trim())
            .bind(upload.bytes.len() as i64)
            .bind(upload.alt_text.as_deref())
            .bind(admin_id)
            .fetch_one(db)
            .await;

        match inserted {
            Ok(image) => {
                track_image_uploaded(upload.bytes.len());
                info!(image_id = image.id, key = %key, "Image uploaded");
                Ok(image)
            }
            Err(e) => {
                if let Err(cleanup) = storage.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(AppError::database(e))
            }
        }
    }

    /// Deletes the row, then the file. Courses, events and documents showing
    /// the image keep existing with `id_image` cleared.
    #[instrument(skip(db, storage))]
    pub async fn delete<S: FileStorage>(db: &PgPool, storage: &S, id: i32) -> Result<(), AppError> {
        let key = sqlx::query_scalar::<_, String>(
            "DELETE FROM images WHERE id = $1 RETURNING storage_key",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Image not found")))?;

        if let Err(e) = storage.delete(&key).await {
            warn!(image_id = id, key = %key, error = %e, "Image row deleted but file removal failed");
        }
        Ok(())
    }
}
