use std::time::Duration;

use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use lescracks_core::AppError;
use lescracks_models::{
    Course, CourseFilterParams, CourseRow, CreateCourseDto, TagSummary, UpdateCourseDto,
};

use crate::metrics::track_course_click;
use crate::utils::associations::{
    Ownership, Relation, link_owner, load_related, replace_associations,
};
use crate::utils::transaction::{finish, run_bounded};

const COURSE_SELECT: &str = r#"
    SELECT
        c.id, c.title, c.description, c.youtube_link,
        c.id_category, cat.name AS category_name,
        c.id_image, i.url AS image_url, i.alt_text AS image_alt_text,
        c.click_count, ac.admin_id AS created_by,
        c.created_at, c.updated_at
    FROM courses c
    JOIN categories cat ON cat.id = c.id_category
    LEFT JOIN images i ON i.id = c.id_image
    LEFT JOIN admin_courses ac ON ac.course_id = c.id
"#;

const INVALID_REFERENCE: &str = "Invalid category or image ID";

async fn insert_course(
    conn: &mut PgConnection,
    admin_id: i32,
    dto: &CreateCourseDto,
) -> Result<i32, sqlx::Error> {
    let id: i32 = sqlx::query_scalar(
        r#"INSERT INTO courses (title, description, youtube_link, id_category, id_image)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
    )
    .bind(&dto.title)
    .bind(&dto.description)
    .bind(&dto.youtube_link)
    .bind(dto.id_category)
    .bind(dto.id_image)
    .fetch_one(&mut *conn)
    .await?;

    link_owner(conn, Ownership::Course, admin_id, id).await?;

    if let Some(tag_ids) = &dto.tag_ids {
        replace_associations(conn, Relation::CourseTags, id, tag_ids).await?;
    }

    Ok(id)
}

async fn update_course(
    conn: &mut PgConnection,
    id: i32,
    dto: &UpdateCourseDto,
) -> Result<(), sqlx::Error> {
    // Locks the row even for tag-only updates, and yields RowNotFound for unknown ids.
    sqlx::query_scalar::<_, i32>(
        r#"UPDATE courses SET
               title = COALESCE($2, title),
               description = COALESCE($3, description),
               youtube_link = COALESCE($4, youtube_link),
               id_category = COALESCE($5, id_category),
               id_image = CASE WHEN $6 THEN $7 ELSE id_image END,
               updated_at = NOW()
           WHERE id = $1
           RETURNING id"#,
    )
    .bind(id)
    .bind(dto.title.as_deref())
    .bind(dto.description.as_deref())
    .bind(dto.youtube_link.as_deref())
    .bind(dto.id_category)
    .bind(dto.id_image.is_some())
    .bind(dto.id_image.flatten())
    .fetch_one(&mut *conn)
    .await?;

    if let Some(tag_ids) = &dto.tag_ids {
        replace_associations(conn, Relation::CourseTags, id, tag_ids).await?;
    }

    Ok(())
}

async fn with_tags(db: &PgPool, rows: Vec<CourseRow>) -> Result<Vec<Course>, AppError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut tags = load_related::<TagSummary>(db, Relation::CourseTags, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let course_tags = tags.remove(&row.id).unwrap_or_default();
            Course::from_row(row, course_tags)
        })
        .collect())
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: CourseFilterParams) -> Result<Vec<Course>, AppError> {
        let sql = format!(
            r#"{COURSE_SELECT}
               WHERE ($1::int IS NULL OR c.id_category = $1)
                 AND ($2::int IS NULL OR EXISTS (
                        SELECT 1 FROM course_tags ct WHERE ct.course_id = c.id AND ct.tag_id = $2))
                 AND ($3::text IS NULL
                        OR c.title ILIKE '%' || $3 || '%'
                        OR c.description ILIKE '%' || $3 || '%')
               ORDER BY c.created_at DESC, c.id DESC"#
        );

        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(filters.category)
            .bind(filters.tag)
            .bind(filters.search)
            .fetch_all(db)
            .await?;

        with_tags(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i32) -> Result<Course, AppError> {
        let sql = format!("{COURSE_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        with_tags(db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Inserts the course, its owner link and its tags in one transaction.
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(
        db: &PgPool,
        admin_id: i32,
        dto: CreateCourseDto,
        limit: Duration,
    ) -> Result<Course, AppError> {
        let write = async {
            let mut tx = db.begin().await?;
            let result = insert_course(&mut tx, admin_id, &dto).await;
            finish(tx, result).await
        };
        let id = run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Course", INVALID_REFERENCE))?;

        info!(course_id = id, admin_id, "Course created");
        Self::get(db, id).await
    }

    /// Applies the given fields and, when `tag_ids` is present, replaces the tag set.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i32,
        dto: UpdateCourseDto,
        limit: Duration,
    ) -> Result<Course, AppError> {
        let write = async {
            let mut tx = db.begin().await?;
            let result = update_course(&mut tx, id, &dto).await;
            finish(tx, result).await
        };
        run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Course", INVALID_REFERENCE))?;

        Self::get(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn record_click(db: &PgPool, id: i32) -> Result<i32, AppError> {
        let click_count = sqlx::query_scalar::<_, i32>(
            "UPDATE courses SET click_count = click_count + 1 WHERE id = $1 RETURNING click_count",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        track_course_click();
        Ok(click_count)
    }
}
