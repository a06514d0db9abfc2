use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagSummary {
    pub id: i32,
    pub name: String,
}

impl From<(i32, String)> for TagSummary {
    fn from((id, name): (i32, String)) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
}

impl From<(i32, String)> for CategorySummary {
    fn from((id, name): (i32, String)) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageSummary {
    pub id: i32,
    pub url: String,
    pub alt_text: Option<String>,
}

impl ImageSummary {
    /// Builds a summary from the nullable columns of a `LEFT JOIN images`.
    pub fn from_join(id: Option<i32>, url: Option<String>, alt_text: Option<String>) -> Option<Self> {
        match (id, url) {
            (Some(id), Some(url)) => Some(Self { id, url, alt_text }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_summary_requires_id_and_url() {
        assert!(ImageSummary::from_join(None, None, None).is_none());
        assert!(ImageSummary::from_join(Some(1), None, None).is_none());

        let image = ImageSummary::from_join(Some(1), Some("/uploads/a.png".into()), None).unwrap();
        assert_eq!(image.id, 1);
    }
}
