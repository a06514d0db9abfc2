use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use lescracks_core::AppError;
use lescracks_models::{CreateTagDto, Tag, TagWithCount, UpdateTagDto};

fn duplicate_name(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::constraint("Tag name already exists");
    }
    AppError::database(e)
}

pub struct TagService;

impl TagService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<TagWithCount>, AppError> {
        let tags = sqlx::query_as::<_, TagWithCount>(
            r#"SELECT
                   t.id, t.name,
                   (SELECT COUNT(*) FROM course_tags ct WHERE ct.tag_id = t.id)
                     + (SELECT COUNT(*) FROM event_tags et WHERE et.tag_id = t.id)
                     + (SELECT COUNT(*) FROM document_tags dt WHERE dt.tag_id = t.id) AS usage_count,
                   t.created_at, t.updated_at
               FROM tags t
               ORDER BY t.name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(tags)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i32) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>("SELECT id, name, created_at, updated_at FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Tag not found")))
    }

    #[instrument(skip(db))]
    pub async fn create(db: &PgPool, dto: CreateTagDto) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await
        .map_err(duplicate_name)
    }

    #[instrument(skip(db))]
    pub async fn update(db: &PgPool, id: i32, dto: UpdateTagDto) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>(
            r#"UPDATE tags SET name = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.name)
        .fetch_optional(db)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| AppError::not_found(anyhow!("Tag not found")))
    }

    /// Deleting a tag also removes it from every course, event and document.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Tag not found")));
        }
        Ok(())
    }
}
