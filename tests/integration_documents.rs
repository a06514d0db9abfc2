mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_category, create_tag, create_test_admin, ids, send, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_document_sets_are_replaced_independently(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();
    let guides = create_category(&pool, "Guides").await;
    let slides = create_category(&pool, "Slides").await;
    let rust = create_tag(&pool, "rust").await;
    let web = create_tag(&pool, "web").await;

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/documents",
        Some(&token),
        Some(json!({
            "title": "Async Rust",
            "description": "Futures explained",
            "file_url": "https://lescracks.com/files/async.pdf",
            "categoryIds": [guides],
            "tagIds": [rust, web]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let document = &body["data"]["document"];
    assert_eq!(ids(&document["categories"]), vec![guides as i64]);
    assert_eq!(ids(&document["tags"]), vec![rust as i64, web as i64]);
    let uri = format!("/api/documents/{}", document["id"]);

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "categoryIds": [slides, guides] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let document = &body["data"]["document"];
    assert_eq!(ids(&document["categories"]), vec![guides as i64, slides as i64]);
    assert_eq!(ids(&document["tags"]), vec![rust as i64, web as i64]);

    let (status, body) = send(
        test_app(pool),
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "categoryIds": [], "tagIds": [web] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let document = &body["data"]["document"];
    assert!(document["categories"].as_array().unwrap().is_empty());
    assert_eq!(ids(&document["tags"]), vec![web as i64]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_document_filters(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let token = admin.token();
    let guides = create_category(&pool, "Guides").await;
    let rust = create_tag(&pool, "rust").await;

    let (_, tagged) = send(
        test_app(pool.clone()),
        "POST",
        "/api/documents",
        Some(&token),
        Some(json!({
            "title": "Ownership",
            "description": "Borrow checker notes",
            "file_url": "https://lescracks.com/files/ownership.pdf",
            "categoryIds": [guides],
            "tagIds": [rust]
        })),
    )
    .await;
    send(
        test_app(pool.clone()),
        "POST",
        "/api/documents",
        Some(&token),
        Some(json!({
            "title": "Color theory",
            "description": "Palettes",
            "file_url": "https://lescracks.com/files/colors.pdf"
        })),
    )
    .await;
    let tagged_id = tagged["data"]["document"]["id"].as_i64().unwrap();

    for query in [
        format!("category={}", guides),
        format!("tag={}", rust),
        "search=borrow".to_string(),
    ] {
        let (status, body) = send(
            test_app(pool.clone()),
            "GET",
            &format!("/api/documents?{}", query),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["data"]["documents"]), vec![tagged_id], "filter {}", query);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_file_url_is_a_validation_error(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;

    let (status, body) = send(
        test_app(pool),
        "POST",
        "/api/documents",
        Some(&admin.token()),
        Some(json!({
            "title": "Broken",
            "description": "No link",
            "file_url": "nowhere"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0], "file_url: must be a valid URL");
}
