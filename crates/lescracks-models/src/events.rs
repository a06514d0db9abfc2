use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use lescracks_core::serde::{
    deserialize_nullable, deserialize_optional_bool, deserialize_optional_i32,
    deserialize_optional_string, deserialize_optional_trimmed, deserialize_trimmed,
};

use crate::common::{ImageSummary, TagSummary};

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub registration_link: Option<String>,
    pub id_image: Option<i32>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub registration_link: Option<String>,
    pub id_image: Option<i32>,
    pub image: Option<ImageSummary>,
    pub tags: Vec<TagSummary>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_row(row: EventRow, tags: Vec<TagSummary>) -> Self {
        Self {
            image: ImageSummary::from_join(row.id_image, row.image_url, row.image_alt_text),
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            event_date: row.event_date,
            registration_link: row.registration_link,
            id_image: row.id_image,
            tags,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub event_date: DateTime<Utc>,
    #[validate(url, length(max = 500))]
    pub registration_link: Option<String>,
    pub id_image: Option<i32>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

/// Partial update. `null` clears `registration_link` or `id_image`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub registration_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i32>)]
    pub id_image: Option<Option<i32>>,
    #[serde(rename = "tagIds", alias = "tag_ids", default)]
    pub tag_ids: Option<Vec<i32>>,
}

impl UpdateEventDto {
    /// Checks the nullable link the derive cannot reach.
    pub fn registration_link_errors(&self) -> Vec<String> {
        match &self.registration_link {
            Some(Some(link)) if link.len() > 500 => {
                vec!["registration_link: must be at most 500 characters".to_string()]
            }
            Some(Some(link)) if !link.starts_with("http://") && !link.starts_with("https://") => {
                vec!["registration_link: must be a valid URL".to_string()]
            }
            _ => Vec::new(),
        }
    }

}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EventFilterParams {
    /// Tag id
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub tag: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    /// Only events dated now or later
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub upcoming: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventData {
    pub event: Event,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventsData {
    pub events: Vec<Event>,
}
