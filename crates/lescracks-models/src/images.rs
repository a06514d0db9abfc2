use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Image {
    pub id: i32,
    pub filename: String,
    pub storage_key: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub alt_text: Option<String>,
    pub uploaded_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageData {
    pub image: Image,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImagesData {
    pub images: Vec<Image>,
}
