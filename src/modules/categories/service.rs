use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use lescracks_core::AppError;
use lescracks_models::{Category, CategoryWithCount, CreateCategoryDto, UpdateCategoryDto};

const DUPLICATE_NAME: &str = "Category name already exists";

fn translate(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::constraint(DUPLICATE_NAME);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::constraint("Category is in use by one or more courses");
        }
    }
    AppError::database(e)
}

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<CategoryWithCount>, AppError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"SELECT
                   c.id, c.name, c.description,
                   (SELECT COUNT(*) FROM courses co WHERE co.id_category = c.id) AS course_count,
                   (SELECT COUNT(*) FROM document_categories dc WHERE dc.category_id = c.id) AS document_count,
                   c.created_at, c.updated_at
               FROM categories c
               ORDER BY c.name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(categories)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i32) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }

    #[instrument(skip(db))]
    pub async fn create(db: &PgPool, dto: CreateCategoryDto) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (name, description)
               VALUES ($1, $2)
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(translate)
    }

    #[instrument(skip(db))]
    pub async fn update(
        db: &PgPool,
        id: i32,
        dto: UpdateCategoryDto,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"UPDATE categories SET
                   name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref())
        .bind(&dto.description)
        .fetch_optional(db)
        .await
        .map_err(translate)?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }

    /// Fails while a course still points at the category. Document links are dropped.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(translate)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Category not found")));
        }
        Ok(())
    }
}
