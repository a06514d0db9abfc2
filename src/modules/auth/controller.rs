use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use lescracks_core::errors::ErrorBody;
use lescracks_core::{AppError, ApiResponse};
use lescracks_models::{
    AdminData, LoginRequest, LoginResponse, LogoutData, RegisterAdminDto, UpdateProfileDto,
};

use super::service::AuthService;
use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new admin (only when registration is enabled)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterAdminDto,
    responses(
        (status = 201, description = "Admin registered", body = ApiResponse<AdminData>),
        (status = 400, description = "Validation failed or email already in use", body = ErrorBody),
        (status = 403, description = "Registration is disabled", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterAdminDto>,
) -> Result<(StatusCode, ApiResponse<AdminData>), AppError> {
    if !state.auth_config.allow_registration {
        return Err(AppError::forbidden("Admin registration is disabled"));
    }

    let admin = AuthService::register(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(AdminData { admin }, "Admin registered"),
    ))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(ApiResponse::with_message(response, "Login successful"))
}

/// Check a token and return the admin it belongs to
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<AdminData>),
        (status = 401, description = "Invalid or expired token", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn verify(
    CurrentAdmin(admin): CurrentAdmin,
) -> Result<ApiResponse<AdminData>, AppError> {
    Ok(ApiResponse::ok(AdminData { admin }))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current admin", body = ApiResponse<AdminData>),
        (status = 401, description = "Invalid or expired token", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_profile(
    CurrentAdmin(admin): CurrentAdmin,
) -> Result<ApiResponse<AdminData>, AppError> {
    Ok(ApiResponse::ok(AdminData { admin }))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AdminData>),
        (status = 400, description = "Validation failed, wrong current password or email in use", body = ErrorBody),
        (status = 401, description = "Invalid or expired token", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin_id = admin.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<ApiResponse<AdminData>, AppError> {
    let admin = AuthService::update_profile(&state.db, admin.id, dto).await?;
    Ok(ApiResponse::with_message(AdminData { admin }, "Profile updated"))
}

/// Log out. Tokens are not tracked server-side, so this only confirms the token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<LogoutData>),
        (status = 401, description = "Invalid or expired token", body = ErrorBody)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(admin_id = admin.id))]
pub async fn logout(
    CurrentAdmin(admin): CurrentAdmin,
) -> Result<ApiResponse<LogoutData>, AppError> {
    Ok(ApiResponse::with_message(
        LogoutData { logged_out: true },
        "Logged out",
    ))
}
