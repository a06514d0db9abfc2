//! Application error taxonomy.
//!
//! Every failure that reaches the HTTP boundary is an [`AppError`]. The status
//! code decides how the error is rendered:
//!
//! | Kind | Status | Client message |
//! |------|--------|----------------|
//! | Validation | 400 | "Validation failed" plus field-level `errors` |
//! | Constraint | 400 | Domain message such as "Tag name already exists" |
//! | Auth | 401 | Generic message, subtype only logged |
//! | Forbidden | 403 | Reason |
//! | Not found | 404 | "Course not found" and similar |
//! | Internal | 500 | Always "Internal server error", detail only logged |
//!
//! The JSON body is always the failure envelope:
//!
//! ```json
//! { "success": false, "message": "Validation failed", "errors": ["email: invalid email"] }
//! ```

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Reasons a bearer token can be rejected, or a token can fail to be minted.
///
/// The subtypes exist for logging. At the HTTP boundary the token failures
/// collapse to a single 401 (see [`AppError::auth`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("admin referenced by token no longer exists")]
    UserNotFound,
    #[error("token signing secret is not configured")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// True for failures caused by the presented credentials rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::MissingSecret | Self::Signing(_))
    }
}

/// The failure half of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub errors: Vec<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    /// Malformed or missing input, with one entry per offending field.
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("Validation failed"),
            errors,
        }
    }

    /// Foreign-key or uniqueness violation reported by the database.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow::anyhow!(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.into()))
    }

    /// Translates an [`AuthError`] into a generic 401.
    ///
    /// The subtype is logged and never sent to the client. Failures to mint a
    /// token are server faults and become a 500 instead.
    pub fn auth(err: AuthError) -> Self {
        if !err.is_client_error() {
            return Self::internal(err);
        }

        tracing::warn!(reason = %err, "Authentication rejected");

        let message = match err {
            AuthError::MissingToken => "Authentication required",
            AuthError::UserNotFound => "User not found",
            _ => "Invalid or expired token",
        };
        Self::unauthorized(message)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// The envelope sent to the client for this error.
    pub fn to_body(&self) -> ErrorBody {
        let message = if self.status.is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.error.to_string()
        };

        ErrorBody {
            success: false,
            message,
            errors: (!self.errors.is_empty()).then(|| self.errors.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        (self.status, Json(self.to_body())).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::internal(anyhow::anyhow!("relation \"courses\" does not exist"));
        let body = err.to_body();

        assert!(!body.success);
        assert_eq!(body.message, "Internal server error");
        assert!(body.errors.is_none());
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = AppError::validation(vec!["email: must be a valid email".to_string()]);
        let body = err.to_body();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Validation failed");
        assert_eq!(
            body.errors,
            Some(vec!["email: must be a valid email".to_string()])
        );
    }

    #[test]
    fn test_token_failures_collapse_to_one_message() {
        for kind in [
            AuthError::InvalidSignature,
            AuthError::Expired,
            AuthError::Malformed,
        ] {
            let err = AppError::auth(kind);
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.to_body().message, "Invalid or expired token");
        }
    }

    #[test]
    fn test_missing_token_and_unknown_admin() {
        let missing = AppError::auth(AuthError::MissingToken);
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.to_body().message, "Authentication required");

        let gone = AppError::auth(AuthError::UserNotFound);
        assert_eq!(gone.status, StatusCode::UNAUTHORIZED);
        assert_eq!(gone.to_body().message, "User not found");
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let err = AppError::auth(AuthError::MissingSecret);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_body().message, "Internal server error");
    }

    #[test]
    fn test_constraint_keeps_domain_message() {
        let err = AppError::constraint("Tag name already exists");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.to_body().message, "Tag name already exists");
    }

    #[test]
    fn test_error_body_omits_empty_errors() {
        let json = serde_json::to_value(AppError::forbidden("nope").to_body()).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("errors").is_none());
    }
}
