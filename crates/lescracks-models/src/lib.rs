//! # LesCracks Models
//!
//! Database entities, request DTOs and response payloads for the LesCracks API.
//!
//! Entities that carry tags or categories come in two shapes: a `*Row` that
//! maps one SQL row (joined summaries included), and the public type that adds
//! the related sets loaded separately.
//!
//! Request DTOs encode association updates as `Option<Vec<i32>>`:
//! an omitted `tagIds` leaves the current set alone, `"tagIds": []` clears it.
//!
//! # Modules
//!
//! - [`admins`]: admin accounts, login and profile payloads
//! - [`categories`], [`tags`]: taxonomy
//! - [`courses`], [`events`], [`documents`]: taggable content
//! - [`images`]: uploaded image metadata
//! - [`common`]: summaries embedded in other payloads

pub mod admins;
pub mod categories;
pub mod common;
pub mod courses;
pub mod documents;
pub mod events;
pub mod images;
pub mod tags;

pub use admins::{
    Admin, AdminCredentials, AdminData, LoginRequest, LoginResponse, LogoutData,
    RegisterAdminDto, UpdateProfileDto,
};
pub use categories::{
    CategoriesData, Category, CategoryData, CategoryWithCount, CreateCategoryDto,
    UpdateCategoryDto,
};
pub use common::{CategorySummary, ImageSummary, TagSummary};
pub use courses::{
    ClickData, Course, CourseData, CourseFilterParams, CourseRow, CoursesData, CreateCourseDto,
    UpdateCourseDto,
};
pub use documents::{
    CreateDocumentDto, Document, DocumentData, DocumentFilterParams, DocumentRow, DocumentsData,
    UpdateDocumentDto,
};
pub use events::{
    CreateEventDto, Event, EventData, EventFilterParams, EventRow, EventsData, UpdateEventDto,
};
pub use images::{Image, ImageData, ImagesData};
pub use tags::{CreateTagDto, Tag, TagData, TagWithCount, TagsData, UpdateTagDto};
