//! Documents carry two association sets, categories and tags. A write that
//! touches both replaces them inside the same transaction as the row itself.

use std::time::Duration;

use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use lescracks_core::AppError;
use lescracks_models::{
    CategorySummary, CreateDocumentDto, Document, DocumentFilterParams, DocumentRow, TagSummary,
    UpdateDocumentDto,
};

use crate::utils::associations::{Relation, load_related, replace_associations};
use crate::utils::transaction::{finish, run_bounded};

const DOCUMENT_SELECT: &str = r#"
    SELECT
        d.id, d.title, d.description, d.file_url,
        d.id_image, i.url AS image_url, i.alt_text AS image_alt_text,
        d.created_at, d.updated_at
    FROM documents d
    LEFT JOIN images i ON i.id = d.id_image
"#;

const INVALID_REFERENCE: &str = "Invalid image ID";

async fn replace_sets(
    conn: &mut PgConnection,
    id: i32,
    category_ids: Option<&[i32]>,
    tag_ids: Option<&[i32]>,
) -> Result<(), sqlx::Error> {
    if let Some(category_ids) = category_ids {
        replace_associations(conn, Relation::DocumentCategories, id, category_ids).await?;
    }
    if let Some(tag_ids) = tag_ids {
        replace_associations(conn, Relation::DocumentTags, id, tag_ids).await?;
    }
    Ok(())
}

async fn insert_document(
    conn: &mut PgConnection,
    dto: &CreateDocumentDto,
) -> Result<i32, sqlx::Error> {
    let id: i32 = sqlx::query_scalar(
        r#"INSERT INTO documents (title, description, file_url, id_image)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(&dto.title)
    .bind(&dto.description)
    .bind(&dto.file_url)
    .bind(dto.id_image)
    .fetch_one(&mut *conn)
    .await?;

    replace_sets(conn, id, dto.category_ids.as_deref(), dto.tag_ids.as_deref()).await?;
    Ok(id)
}

async fn update_document(
    conn: &mut PgConnection,
    id: i32,
    dto: &UpdateDocumentDto,
) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"UPDATE documents SET
               title = COALESCE($2, title),
               description = COALESCE($3, description),
               file_url = COALESCE($4, file_url),
               id_image = CASE WHEN $5 THEN $6 ELSE id_image END,
               updated_at = NOW()
           WHERE id = $1
           RETURNING id"#,
    )
    .bind(id)
    .bind(dto.title.as_deref())
    .bind(dto.description.as_deref())
    .bind(dto.file_url.as_deref())
    .bind(dto.id_image.is_some())
    .bind(dto.id_image.flatten())
    .fetch_one(&mut *conn)
    .await?;

    replace_sets(conn, id, dto.category_ids.as_deref(), dto.tag_ids.as_deref()).await
}

async fn with_relations(db: &PgPool, rows: Vec<DocumentRow>) -> Result<Vec<Document>, AppError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut categories =
        load_related::<CategorySummary>(db, Relation::DocumentCategories, &ids).await?;
    let mut tags = load_related::<TagSummary>(db, Relation::DocumentTags, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            Document::from_row(
                row,
                categories.remove(&id).unwrap_or_default(),
                tags.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

pub struct DocumentService;

impl DocumentService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: DocumentFilterParams,
    ) -> Result<Vec<Document>, AppError> {
        let sql = format!(
            r#"{DOCUMENT_SELECT}
               WHERE ($1::int IS NULL OR EXISTS (
                        SELECT 1 FROM document_categories dc
                        WHERE dc.document_id = d.id AND dc.category_id = $1))
                 AND ($2::int IS NULL OR EXISTS (
                        SELECT 1 FROM document_tags dt WHERE dt.document_id = d.id AND dt.tag_id = $2))
                 AND ($3::text IS NULL
                        OR d.title ILIKE '%' || $3 || '%'
                        OR d.description ILIKE '%' || $3 || '%')
               ORDER BY d.created_at DESC, d.id DESC"#
        );

        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(filters.category)
            .bind(filters.tag)
            .bind(filters.search)
            .fetch_all(db)
            .await?;

        with_relations(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i32) -> Result<Document, AppError> {
        let sql = format!("{DOCUMENT_SELECT} WHERE d.id = $1");
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Document not found")))?;

        with_relations(db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Document not found")))
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(
        db: &PgPool,
        dto: CreateDocumentDto,
        limit: Duration,
    ) -> Result<Document, AppError> {
        let write = async {
            let mut tx = db.begin().await?;
            let result = insert_document(&mut tx, &dto).await;
            finish(tx, result).await
        };
        let id = run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Document", INVALID_REFERENCE))?;

        info!(document_id = id, "Document created");
        Self::get(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i32,
        dto: UpdateDocumentDto,
        limit: Duration,
    ) -> Result<Document, AppError> {
        let write = async {
            let mut tx = db.begin().await?;
            let result = update_document(&mut tx, id, &dto).await;
            finish(tx, result).await
        };
        run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Document", INVALID_REFERENCE))?;

        Self::get(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Document not found")));
        }
        Ok(())
    }
}
