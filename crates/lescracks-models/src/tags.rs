use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use lescracks_core::serde::deserialize_trimmed;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag with the number of courses, events and documents carrying it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TagWithCount {
    pub id: i32,
    pub name: String,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTagDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagData {
    pub tag: Tag,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagsData {
    pub tags: Vec<TagWithCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_bounds() {
        assert!(CreateTagDto { name: "rust".into() }.validate().is_ok());
        assert!(CreateTagDto { name: "".into() }.validate().is_err());
        assert!(CreateTagDto { name: "x".repeat(51) }.validate().is_err());
    }
}
