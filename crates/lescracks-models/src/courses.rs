//! Course models.
//!
//! A course belongs to exactly one category, may show one image, and carries
//! any number of tags. The creating admin is recorded through `admin_courses`
//! and exposed as `created_by`.

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

/// One row of the course listing query, with category and image joined in.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub youtube_link: String,
    pub id_category: i32,
    pub category_name: String,
    pub id_image: Option<i32>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub click_count: i32,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub youtube_link: String,
    pub id_category: i32,
    pub id_image: Option<i32>,
    pub click_count: i32,
    pub category: CategorySummary,
    pub image: Option<ImageSummary>,
    pub tags: Vec<TagSummary>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn from_row(row: CourseRow, tags: Vec<TagSummary>) -> Self {
        Self {
            image: ImageSummary::from_join(row.id_image, row.image_url, row.image_alt_text),
            category: CategorySummary {
                id: row.id_category,
                name: row.category_name,
            },
            id: row.id,
            title: row.title,
            description: row.description,
            youtube_link: row.youtube_link,
            id_category: row.id_category,
            id_image: row.id_image,
            click_count: row.click_count,
            tags,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(url, length(max = 500))]
    pub youtube_link: String,
    pub id_category: i32,
    pub id_image: Option<i32>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

/// Partial update. `id_image: null` detaches the image; omitting it keeps it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(url, length(max = 500))]
    pub youtube_link: Option<String>,
    pub id_category: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i32>)]
    pub id_image: Option<Option<i32>>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    /// Category id
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub category: Option<i32>,
    /// Tag id
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub tag: Option<i32>,
    /// Case-insensitive match on title or description
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseData {
    pub course: Course,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CoursesData {
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClickData {
    pub click_count: i32,
}
