use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use lescracks_core::serde::{
    deserialize_nullable, deserialize_optional_i32, deserialize_optional_string,
    deserialize_optional_trimmed, deserialize_trimmed,
};

use crate::common::{CategorySummary, ImageSummary, TagSummary};

#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub id_image: Option<i32>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub id_image: Option<i32>,
    pub image: Option<ImageSummary>,
    pub categories: Vec<CategorySummary>,
    pub tags: Vec<TagSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn from_row(
        row: DocumentRow,
        categories: Vec<CategorySummary>,
        tags: Vec<TagSummary>,
    ) -> Self {
        Self {
            image: ImageSummary::from_join(row.id_image, row.image_url, row.image_alt_text),
            id: row.id,
            title: row.title,
            description: row.description,
            file_url: row.file_url,
            id_image: row.id_image,
            categories,
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(url, length(max = 500))]
    pub file_url: String,
    pub id_image: Option<i32>,
    #[serde(rename = "categoryIds", alias = "category_ids", default)]
    pub category_ids: Option<Vec<i32>>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(url, length(max = 500))]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i32>)]
    pub id_image: Option<Option<i32>>,
    #[serde(rename = "categoryIds", alias = "category_ids", default)]
    pub category_ids: Option<Vec<i32>>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DocumentFilterParams {
    /// Category id
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub category: Option<i32>,
    /// Tag id
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub tag: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentData {
    pub document: Document,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentsData {
    pub documents: Vec<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_reads_both_id_sets() {
        let dto: UpdateDocumentDto =
            serde_json::from_str(r#"{"categoryIds": [3], "tagIds": []}"#).unwrap();
        assert_eq!(dto.category_ids, Some(vec![3]));
        assert_eq!(dto.tag_ids, Some(vec![]));
        assert_eq!(dto.title, None);
    }
}
