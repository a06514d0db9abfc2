use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use lescracks_core::errors::ErrorBody;
use lescracks_models::{
    Admin, AdminData, CategoriesData, Category, CategoryData, CategorySummary, CategoryWithCount,
    ClickData, Course, CourseData, CoursesData, CreateCategoryDto, CreateCourseDto,
    CreateDocumentDto, CreateEventDto, CreateTagDto, Document, DocumentData, DocumentsData, Event,
    EventData, EventsData, Image, ImageData, ImageSummary, ImagesData, LoginRequest,
    LoginResponse, LogoutData, RegisterAdminDto, Tag, TagData, TagSummary, TagWithCount, TagsData,
    UpdateCategoryDto, UpdateCourseDto, UpdateDocumentDto, UpdateEventDto, UpdateProfileDto,
    UpdateTagDto,
};

use crate::modules::images::controller::ImageUploadForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::verify,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::logout,
        crate::modules::categories::controller::list_categories,
        crate::modules::categories::controller::get_category,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::update_category,
        crate::modules::categories::controller::delete_category,
        crate::modules::tags::controller::list_tags,
        crate::modules::tags::controller::get_tag,
        crate::modules::tags::controller::create_tag,
        crate::modules::tags::controller::update_tag,
        crate::modules::tags::controller::delete_tag,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::record_click,
        crate::modules::events::controller::list_events,
        crate::modules::events::controller::get_event,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::delete_event,
        crate::modules::documents::controller::list_documents,
        crate::modules::documents::controller::get_document,
        crate::modules::documents::controller::create_document,
        crate::modules::documents::controller::update_document,
        crate::modules::documents::controller::delete_document,
        crate::modules::images::controller::list_images,
        crate::modules::images::controller::upload_image,
        crate::modules::images::controller::delete_image,
    ),
    components(
        schemas(
            ErrorBody,
            Admin,
            AdminData,
            RegisterAdminDto,
            LoginRequest,
            LoginResponse,
            LogoutData,
            UpdateProfileDto,
            Category,
            CategoryWithCount,
            CategorySummary,
            CategoryData,
            CategoriesData,
            CreateCategoryDto,
            UpdateCategoryDto,
            Tag,
            TagWithCount,
            TagSummary,
            TagData,
            TagsData,
            CreateTagDto,
            UpdateTagDto,
            Course,
            CourseData,
            CoursesData,
            CreateCourseDto,
            UpdateCourseDto,
            ClickData,
            Event,
            EventData,
            EventsData,
            CreateEventDto,
            UpdateEventDto,
            Document,
            DocumentData,
            DocumentsData,
            CreateDocumentDto,
            UpdateDocumentDto,
            Image,
            ImageSummary,
            ImageData,
            ImagesData,
            ImageUploadForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Admin registration, login and profile"),
        (name = "Categories", description = "Course and document categories"),
        (name = "Tags", description = "Tags shared by courses, events and documents"),
        (name = "Courses", description = "Video courses"),
        (name = "Events", description = "Community events"),
        (name = "Documents", description = "Downloadable documents"),
        (name = "Images", description = "Image uploads")
    ),
    info(
        title = "LesCracks API",
        version = "0.1.0",
        description = "Content API behind the LesCracks website and its admin dashboard. Writes require an admin bearer token.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
