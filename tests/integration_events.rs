mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{TestAdmin, create_tag, create_test_admin, ids, send, test_app};

async fn create_event(pool: &PgPool, admin: &TestAdmin, days_from_now: i64, tag_ids: &[i32]) -> Value {
    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/events",
        Some(&admin.token()),
        Some(json!({
            "title": format!("Meetup in {} days", days_from_now),
            "description": "Talks and networking",
            "location": "Dakar",
            "event_date": (Utc::now() + Duration::days(days_from_now)).to_rfc3339(),
            "registration_link": "https://lescracks.com/register",
            "tagIds": tag_ids
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["event"].clone()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_event_links_owner_and_tags(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let tag = create_tag(&pool, "community").await;

    let event = create_event(&pool, &admin, 10, &[tag, 31_337]).await;
    assert_eq!(event["created_by"], admin.id);
    assert_eq!(event["location"], "Dakar");
    assert_eq!(ids(&event["tags"]), vec![tag as i64]);

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_events WHERE admin_id = $1")
        .bind(admin.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owners, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upcoming_filter_hides_past_events(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let past = create_event(&pool, &admin, -5, &[]).await;
    let soon = create_event(&pool, &admin, 3, &[]).await;
    let later = create_event(&pool, &admin, 30, &[]).await;

    let (_, body) = send(test_app(pool.clone()), "GET", "/api/events", None, None).await;
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 3);

    let (status, body) = send(test_app(pool), "GET", "/api/events?upcoming=true", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&Value> = body["data"]["events"].as_array().unwrap().iter().map(|e| &e["id"]).collect();
    assert_eq!(listed, vec![&soon["id"], &later["id"]]);
    assert!(!listed.contains(&&past["id"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_link_can_be_cleared(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let event = create_event(&pool, &admin, 7, &[]).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&admin.token()),
        Some(json!({ "registration_link": "not a link" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "registration_link: must be a valid URL");

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&admin.token()),
        Some(json!({ "registration_link": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["event"]["registration_link"].is_null());
    assert_eq!(body["data"]["event"]["location"], "Dakar");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_image_is_rejected(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/events",
        Some(&admin.token()),
        Some(json!({
            "title": "Hackathon",
            "description": "48 hours",
            "location": "Abidjan",
            "event_date": Utc::now().to_rfc3339(),
            "id_image": 404
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid image ID");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_event(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let tag = create_tag(&pool, "community").await;
    let event = create_event(&pool, &admin, 1, &[tag]).await;
    let uri = format!("/api/events/{}", event["id"]);

    let (status, _) = send(test_app(pool.clone()), "DELETE", &uri, Some(&admin.token()), None).await;
    assert_eq!(status, StatusCode::OK);

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);

    let (status, body) = send(test_app(pool), "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}
