//! Admin accounts and the authentication payloads built around them.
//!
//! [`Admin`] never carries the password hash. The hash only travels in
//! [`AdminCredentials`], which is not serializable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use lescracks_core::serde::{deserialize_optional_trimmed, deserialize_trimmed};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin row including the stored password hash. Used only by the login path.
#[derive(Debug, Clone, FromRow)]
pub struct AdminCredentials {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminCredentials {
    pub fn into_admin(self) -> Admin {
        Admin {
            id: self.id,
            name: self.name,
            email: self.email,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterAdminDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminData {
    pub admin: Admin,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutData {
    pub logged_out: bool,
}

/// Partial self-update. Changing the password requires the current one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub new_password: Option<String>,
}
