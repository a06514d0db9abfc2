use std::time::Duration;

use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use lescracks_core::AppError;
use lescracks_models::{
    CreateEventDto, Event, EventFilterParams, EventRow, TagSummary, UpdateEventDto,
};

use crate::utils::associations::{
    Ownership, Relation, link_owner, load_related, replace_associations,
};
use crate::utils::transaction::{finish, run_bounded};

const EVENT_SELECT: &str = r#"
    SELECT
        e.id, e.title, e.description, e.location, e.event_date, e.registration_link,
        e.id_image, i.url AS image_url, i.alt_text AS image_alt_text,
        ae.admin_id AS created_by,
        e.created_at, e.updated_at
    FROM events e
    LEFT JOIN images i ON i.id = e.id_image
    LEFT JOIN admin_events ae ON ae.event_id = e.id
"#;

const INVALID_REFERENCE: &str = "Invalid image ID";

async fn insert_event(
    conn: &mut PgConnection,
    admin_id: i32,
    dto: &CreateEventDto,
) -> Result<i32, sqlx::Error> {
    let id: i32 = sqlx::query_scalar(
        r#"INSERT INTO events (title, description, location, event_date, registration_link, id_image)
           VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING id"#,
    )
    .bind(&dto.title)
    .bind(&dto.description)
    .bind(&dto.location)
    .bind(dto.event_date)
    .bind(dto.registration_link.as_deref())
    .bind(dto.id_image)
    .fetch_one(&mut *conn)
    .await?;

    link_owner(conn, Ownership::Event, admin_id, id).await?;

    if let Some(tag_ids) = &dto.tag_ids {
        replace_associations(conn, Relation::EventTags, id, tag_ids).await?;
    }

    Ok(id)
}

async fn update_event(
    conn: &mut PgConnection,
    id: i32,
    dto: &UpdateEventDto,
) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"UPDATE events SET
               title = COALESCE($2, title),
               description = COALESCE($3, description),
               location = COALESCE($4, location),
               event_date = COALESCE($5, event_date),
               registration_link = CASE WHEN $6 THEN $7 ELSE registration_link END,
               id_image = CASE WHEN $8 THEN $9 ELSE id_image END,
               updated_at = NOW()
           WHERE id = $1
           RETURNING id"#,
    )
    .bind(id)
    .bind(dto.title.as_deref())
    .bind(dto.description.as_deref())
    .bind(dto.location.as_deref())
    .bind(dto.event_date)
    .bind(dto.registration_link.is_some())
    .bind(dto.registration_link.clone().flatten())
    .bind(dto.id_image.is_some())
    .bind(dto.id_image.flatten())
    .fetch_one(&mut *conn)
    .await?;

    if let Some(tag_ids) = &dto.tag_ids {
        replace_associations(conn, Relation::EventTags, id, tag_ids).await?;
    }

    Ok(())
}

async fn with_tags(db: &PgPool, rows: Vec<EventRow>) -> Result<Vec<Event>, AppError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut tags = load_related::<TagSummary>(db, Relation::EventTags, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let event_tags = tags.remove(&row.id).unwrap_or_default();
            Event::from_row(row, event_tags)
        })
        .collect())
}

pub struct EventService;

impl EventService {
    /// Upcoming listings are ordered soonest first, everything else newest first.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: EventFilterParams) -> Result<Vec<Event>, AppError> {
        let upcoming = filters.upcoming.unwrap_or(false);
        let order = if upcoming {
            "e.event_date ASC, e.id ASC"
        } else {
            "e.event_date DESC, e.id DESC"
        };
        let sql = format!(
            r#"{EVENT_SELECT}
               WHERE ($1::int IS NULL OR EXISTS (
                        SELECT 1 FROM event_tags et WHERE et.event_id = e.id AND et.tag_id = $1))
                 AND ($2::text IS NULL
                        OR e.title ILIKE '%' || $2 || '%'
                        OR e.description ILIKE '%' || $2 || '%'
                        OR e.location ILIKE '%' || $2 || '%')
                 AND (NOT $3 OR e.event_date >= NOW())
               ORDER BY {order}"#
        );

        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(filters.tag)
            .bind(filters.search)
            .bind(upcoming)
            .fetch_all(db)
            .await?;

        with_tags(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: i32) -> Result<Event, AppError> {
        let sql = format!("{EVENT_SELECT} WHERE e.id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))?;

        with_tags(db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(
        db: &PgPool,
        admin_id: i32,
        dto: CreateEventDto,
        limit: Duration,
    ) -> Result<Event, AppError> {
        let write = async {
            let mut tx = db.begin().await?;
            let result = insert_event(&mut tx, admin_id, &dto).await;
            finish(tx, result).await
        };
        let id = run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Event", INVALID_REFERENCE))?;

        info!(event_id = id, admin_id, "Event created");
        Self::get(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: i32,
        dto: UpdateEventDto,
        limit: Duration,
    ) -> Result<Event, AppError> {
        let link_errors = dto.registration_link_errors();
        if !link_errors.is_empty() {
            return Err(AppError::validation(link_errors));
        }

        let write = async {
            let mut tx = db.begin().await?;
            let result = update_event(&mut tx, id, &dto).await;
            finish(tx, result).await
        };
        run_bounded(limit, write)
            .await
            .map_err(|e| e.into_app_error("Event", INVALID_REFERENCE))?;

        Self::get(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Event not found")));
        }
        Ok(())
    }
}
