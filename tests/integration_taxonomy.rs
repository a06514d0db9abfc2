mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_category, create_tag, create_test_admin, send, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_tag_crud(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/tags",
        Some(&token),
        Some(json!({ "name": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Tag created");
    let id = body["data"]["tag"]["id"].as_i64().unwrap();

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &format!("/api/tags/{}", id),
        Some(&token),
        Some(json!({ "name": "rustlang" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tag"]["name"], "rustlang");

    let (status, body) = send(test_app(pool.clone()), "GET", "/api/tags", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"][0]["name"], "rustlang");
    assert_eq!(body["data"]["tags"][0]["usage_count"], 0);

    let (status, _) = send(
        test_app(pool.clone()),
        "DELETE",
        &format!("/api/tags/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(test_app(pool), "GET", &format!("/api/tags/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Tag not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_tag_name_is_rejected(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    create_tag(&pool, "rust").await;

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/tags",
        Some(&admin.token()),
        Some(json!({ "name": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Tag name already exists");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name = 'rust'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tag_usage_counts_every_relation(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();
    let category = create_category(&pool, "Programming").await;
    let tag = create_tag(&pool, "rust").await;

    send(
        test_app(pool.clone()),
        "POST",
        "/api/courses",
        Some(&token),
        Some(json!({
            "title": "Rust",
            "description": "Intro",
            "youtube_link": "https://www.youtube.com/watch?v=x",
            "id_category": category,
            "tagIds": [tag]
        })),
    )
    .await;
    send(
        test_app(pool.clone()),
        "POST",
        "/api/documents",
        Some(&token),
        Some(json!({
            "title": "Cheat sheet",
            "description": "One page",
            "file_url": "https://lescracks.com/files/rust.pdf",
            "tagIds": [tag]
        })),
    )
    .await;

    let (_, body) = send(test_app(pool), "GET", "/api/tags", None, None).await;
    assert_eq!(body["data"]["tags"][0]["usage_count"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_category_in_use_cannot_be_deleted(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();
    let category = create_category(&pool, "Programming").await;

    let (status, _) = send(
        test_app(pool.clone()),
        "POST",
        "/api/courses",
        Some(&token),
        Some(json!({
            "title": "Rust",
            "description": "Intro",
            "youtube_link": "https://www.youtube.com/watch?v=x",
            "id_category": category
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        test_app(pool.clone()),
        "DELETE",
        &format!("/api/categories/{}", category),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category is in use by one or more courses");

    let (_, body) = send(test_app(pool), "GET", "/api/categories", None, None).await;
    assert_eq!(body["data"]["categories"][0]["course_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_category_create_and_duplicate(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "Design", "description": "UI and UX" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category"]["description"], "UI and UX");

    let (status, body) = send(
        test_app(pool),
        "POST",
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "Design" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category name already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reads_are_public_writes_are_not(pool: PgPool) {
    let (status, body) = send(test_app(pool.clone()), "GET", "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(
        test_app(pool),
        "POST",
        "/api/categories",
        None,
        Some(json!({ "name": "Design" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}
