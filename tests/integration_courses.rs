mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{
    TestAdmin, course_tag_ids, create_category, create_tag, create_test_admin, ids, send,
    test_app,
};

async fn create_course(pool: &PgPool, admin: &TestAdmin, body: Value) -> (StatusCode, Value) {
    send(
        test_app(pool.clone()),
        "POST",
        "/api/courses",
        Some(&admin.token()),
        Some(body),
    )
    .await
}

fn course_body(category_id: i32, tag_ids: Option<Vec<i32>>) -> Value {
    let mut body = json!({
        "title": "Rust for beginners",
        "description": "Ownership, borrowing and lifetimes",
        "youtube_link": "https://www.youtube.com/watch?v=abc123",
        "id_category": category_id,
    });
    if let Some(tag_ids) = tag_ids {
        body["tagIds"] = json!(tag_ids);
    }
    body
}

async fn tag_created_at(pool: &PgPool, course_id: i32, tag_id: i32) -> DateTime<Utc> {
    sqlx::query_scalar("SELECT created_at FROM course_tags WHERE course_id = $1 AND tag_id = $2")
        .bind(course_id)
        .bind(tag_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_course_with_tags(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let rust = create_tag(&pool, "rust").await;
    let web = create_tag(&pool, "web").await;

    let (status, body) = create_course(&pool, &admin, course_body(category, Some(vec![rust, web]))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let course = &body["data"]["course"];
    assert_eq!(course["title"], "Rust for beginners");
    assert_eq!(course["category"]["name"], "Programming");
    assert_eq!(course["created_by"], admin.id);
    assert_eq!(course["click_count"], 0);
    assert!(course["image"].is_null());
    assert_eq!(ids(&course["tags"]), vec![rust as i64, web as i64]);

    let owner: i32 = sqlx::query_scalar("SELECT admin_id FROM admin_courses WHERE course_id = $1")
        .bind(course["id"].as_i64().unwrap() as i32)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owner, admin.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_tag_ids_are_skipped(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let rust = create_tag(&pool, "rust").await;

    let (status, body) =
        create_course(&pool, &admin, course_body(category, Some(vec![rust, 9_999, rust]))).await;
    assert_eq!(status, StatusCode::CREATED);

    let course_id = body["data"]["course"]["id"].as_i64().unwrap() as i32;
    assert_eq!(course_tag_ids(&pool, course_id).await, vec![rust]);
    assert_eq!(ids(&body["data"]["course"]["tags"]), vec![rust as i64]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_category_rolls_back_everything(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let rust = create_tag(&pool, "rust").await;

    let (status, body) = create_course(&pool, &admin, course_body(4_242, Some(vec![rust]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid category or image ID");

    let courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(&pool)
        .await
        .unwrap();
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_courses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((courses, links, owners), (0, 0, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_keeps_unchanged_rows(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let t1 = create_tag(&pool, "one").await;
    let t2 = create_tag(&pool, "two").await;
    let t3 = create_tag(&pool, "three").await;

    let (_, body) = create_course(&pool, &admin, course_body(category, Some(vec![t1, t2]))).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap() as i32;
    let kept_since = tag_created_at(&pool, course_id, t2).await;

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &format!("/api/courses/{}", course_id),
        Some(&admin.token()),
        Some(json!({ "tagIds": [t2, t3] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["course"]["tags"]), vec![t2 as i64, t3 as i64]);

    assert_eq!(course_tag_ids(&pool, course_id).await, vec![t2, t3]);
    assert_eq!(tag_created_at(&pool, course_id, t2).await, kept_since);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_omitted_tags_are_untouched_and_empty_clears(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let t1 = create_tag(&pool, "one").await;
    let t2 = create_tag(&pool, "two").await;

    let (_, body) = create_course(&pool, &admin, course_body(category, Some(vec![t1, t2]))).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap() as i32;
    let uri = format!("/api/courses/{}", course_id);

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&admin.token()),
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["course"]["title"], "Renamed");
    assert_eq!(course_tag_ids(&pool, course_id).await, vec![t1, t2]);

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&admin.token()),
        Some(json!({ "tagIds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["course"]["tags"].as_array().unwrap().is_empty());
    assert!(course_tag_ids(&pool, course_id).await.is_empty());
    assert_eq!(body["data"]["course"]["title"], "Renamed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_tag_write_rolls_back_field_changes(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let t1 = create_tag(&pool, "one").await;
    let t2 = create_tag(&pool, "two").await;

    let (_, body) = create_course(&pool, &admin, course_body(category, Some(vec![t1]))).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap() as i32;

    sqlx::query(
        "CREATE FUNCTION reject_course_tag() RETURNS trigger AS $$
         BEGIN RAISE EXCEPTION 'course_tags is read-only'; END;
         $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_course_tag BEFORE INSERT ON course_tags
         FOR EACH ROW EXECUTE FUNCTION reject_course_tag()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(
        test_app(pool.clone()),
        "PUT",
        &format!("/api/courses/{}", course_id),
        Some(&admin.token()),
        Some(json!({ "title": "Should not stick", "tagIds": [t2] })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error");

    let title: String = sqlx::query_scalar("SELECT title FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(title, "Rust for beginners");
    assert_eq!(course_tag_ids(&pool, course_id).await, vec![t1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unknown_course_is_not_found(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;

    let (status, body) = send(
        test_app(pool),
        "PUT",
        "/api/courses/777",
        Some(&admin.token()),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let programming = create_category(&pool, "Programming").await;
    let design = create_category(&pool, "Design").await;
    let rust = create_tag(&pool, "rust").await;

    let (_, first) = create_course(&pool, &admin, course_body(programming, Some(vec![rust]))).await;
    let mut other = course_body(design, None);
    other["title"] = json!("Figma basics");
    other["description"] = json!("Layouts and components");
    let (_, second) = create_course(&pool, &admin, other).await;

    let first_id = first["data"]["course"]["id"].as_i64().unwrap();
    let second_id = second["data"]["course"]["id"].as_i64().unwrap();

    let (status, body) = send(test_app(pool.clone()), "GET", "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["courses"]), vec![first_id, second_id]);

    let (_, body) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/courses?tag={}", rust),
        None,
        None,
    )
    .await;
    assert_eq!(ids(&body["data"]["courses"]), vec![first_id]);

    let (_, body) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/courses?category={}", design),
        None,
        None,
    )
    .await;
    assert_eq!(ids(&body["data"]["courses"]), vec![second_id]);

    let (_, body) = send(test_app(pool.clone()), "GET", "/api/courses?search=FIGMA", None, None).await;
    assert_eq!(ids(&body["data"]["courses"]), vec![second_id]);

    let (_, body) = send(test_app(pool), "GET", "/api/courses?category=&search=", None, None).await;
    assert_eq!(body["data"]["courses"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_click_counter(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let (_, body) = create_course(&pool, &admin, course_body(category, None)).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();
    let uri = format!("/api/courses/{}/click", course_id);

    let (status, body) = send(test_app(pool.clone()), "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["click_count"], 1);

    let (_, body) = send(test_app(pool.clone()), "POST", &uri, None, None).await;
    assert_eq!(body["data"]["click_count"], 2);

    let (status, _) = send(test_app(pool), "POST", "/api/courses/999/click", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_course_removes_links(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;
    let rust = create_tag(&pool, "rust").await;
    let (_, body) = create_course(&pool, &admin, course_body(category, Some(vec![rust]))).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap() as i32;
    let uri = format!("/api/courses/{}", course_id);

    let (status, body) = send(test_app(pool.clone()), "DELETE", &uri, Some(&admin.token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course deleted");
    assert!(course_tag_ids(&pool, course_id).await.is_empty());

    let (status, _) = send(test_app(pool.clone()), "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(test_app(pool), "DELETE", &uri, Some(&admin.token()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blank_title_is_rejected(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;

    let mut body = course_body(category, None);
    body["title"] = json!("   ");
    let (status, body) = create_course(&pool, &admin, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("title: ")));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_title_is_stored_trimmed(pool: PgPool) {
    let admin = create_test_admin(&pool, "password123").await;
    let category = create_category(&pool, "Programming").await;

    let mut body = course_body(category, None);
    body["title"] = json!("  Rust for beginners  ");
    let (status, body) = create_course(&pool, &admin, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["course"]["title"], "Rust for beginners");

    let id = body["data"]["course"]["id"].as_i64().unwrap();
    let (status, _) = send(
        test_app(pool.clone()),
        "PUT",
        &format!("/api/courses/{}", id),
        Some(&admin.token()),
        Some(json!({ "title": "\t " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
