use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use lescracks_auth::verify_token;
use lescracks_core::{AppError, AuthError};
use lescracks_models::Admin;

use crate::state::AppState;

/// The bearer token from the `Authorization` header, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

pub async fn find_admin(db: &PgPool, admin_id: i32) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        r#"SELECT id, name, email, last_login_at, created_at, updated_at
           FROM admins WHERE id = $1"#,
    )
    .bind(admin_id)
    .fetch_optional(db)
    .await
}

/// Verifies the bearer token and loads the admin it names. Read-only.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Admin, AppError> {
    let token = bearer_token(headers).map_err(AppError::auth)?;
    let claims = verify_token(token, &state.jwt_config).map_err(AppError::auth)?;
    let admin_id = claims.admin_id().map_err(AppError::auth)?;

    find_admin(&state.db, admin_id)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::auth(AuthError::UserNotFound))
}

/// The authenticated admin making the request.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(current.clone());
        }

        let admin = authenticate(&parts.headers, state).await?;
        let current = CurrentAdmin(admin);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Route layer rejecting unauthenticated requests before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin = authenticate(req.headers(), &state).await?;
    req.extensions_mut().insert(CurrentAdmin(admin));
    Ok(next.run(req).await)
}
