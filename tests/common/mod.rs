#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lescracks::lescracks_auth::issue_token;
use lescracks::lescracks_config::{
    AuthConfig, CorsConfig, DatabaseConfig, JwtConfig, UploadConfig,
};
use lescracks::lescracks_core::{ApiEnvelope, hash_password};
use lescracks::router::init_router;
use lescracks::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        expiry_secs: 3600,
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    let upload_dir = std::env::temp_dir().join(format!("lescracks-test-{}", Uuid::new_v4()));
    AppState::new(
        pool,
        jwt_config(),
        DatabaseConfig::for_existing_pool(Duration::from_secs(10)),
        AuthConfig {
            allow_registration: true,
        },
        CorsConfig::from_vars(|_: &str| None),
        UploadConfig {
            dir: upload_dir,
            base_url: "/uploads".to_string(),
            max_bytes: 1024 * 1024,
        },
    )
}

pub fn test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub struct TestAdmin {
    pub id: i32,
    pub email: String,
    pub password: String,
}

impl TestAdmin {
    pub fn token(&self) -> String {
        issue_token(self.id, &self.email, &jwt_config()).unwrap()
    }
}

pub fn unique_email() -> String {
    format!("admin-{}@lescracks.test", Uuid::new_v4())
}

pub async fn create_test_admin(pool: &PgPool, password: &str) -> TestAdmin {
    let email = unique_email();
    let hashed = hash_password(password).unwrap();

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO admins (name, email, password) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Test Admin")
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAdmin {
        id,
        email,
        password: password.to_string(),
    }
}

pub async fn create_tag(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO tags (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_category(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn build_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body, requiring the `{success, ...}` envelope.
///
/// Panics when the body is not an envelope or when `success` disagrees with
/// the status code. Returns the raw JSON for field-level assertions.
pub async fn read_envelope(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let envelope: ApiEnvelope<Value> = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "{} response is not an envelope ({}): {}",
            status,
            e,
            String::from_utf8_lossy(&bytes)
        )
    });
    assert_eq!(
        envelope.is_success(),
        status.is_success(),
        "success flag does not match status {}",
        status
    );

    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Sends one request through the router and decodes the envelope.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .oneshot(build_request(method, uri, token, body))
        .await
        .unwrap();
    read_envelope(response).await
}

/// Like [`send`] but decodes `data` into `T`.
pub async fn send_typed<T: DeserializeOwned>(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, ApiEnvelope<T>) {
    let (status, json) = send(app, method, uri, token, body).await;
    (status, serde_json::from_value(json).unwrap())
}

pub async fn course_tag_ids(pool: &PgPool, course_id: i32) -> Vec<i32> {
    sqlx::query_scalar("SELECT tag_id FROM course_tags WHERE course_id = $1 ORDER BY tag_id")
        .bind(course_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

/// Sorted `id` fields of a JSON array of objects.
pub fn ids(values: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}
