//! Generated rows and seeding configuration.

use chrono::{DateTime, Utc};

pub struct CategorySeed {
    pub name: String,
    pub description: Option<String>,
}

pub struct TagSeed {
    pub name: String,
}

pub struct CourseSeed {
    pub title: String,
    pub description: String,
    pub youtube_link: String,
    pub id_category: i32,
    pub tag_ids: Vec<i32>,
}

pub struct EventSeed {
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub registration_link: Option<String>,
    pub tag_ids: Vec<i32>,
}

pub struct DocumentSeed {
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub category_ids: Vec<i32>,
    pub tag_ids: Vec<i32>,
}

/// How many rows of each kind to generate.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub categories: usize,
    pub tags: usize,
    pub courses: usize,
    pub events: usize,
    pub documents: usize,
    /// Upper bound on tags attached to one item.
    pub max_tags_per_item: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            categories: 6,
            tags: 15,
            courses: 30,
            events: 10,
            documents: 10,
            max_tags_per_item: 4,
        }
    }
}

impl SeedConfig {
    pub fn new(categories: usize, tags: usize) -> Self {
        Self {
            categories,
            tags,
            ..Default::default()
        }
    }

    pub fn with_courses(mut self, courses: usize) -> Self {
        self.courses = courses;
        self
    }

    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }

    pub fn with_documents(mut self, documents: usize) -> Self {
        self.documents = documents;
        self
    }
}
