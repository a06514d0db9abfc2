use std::time::Duration;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use lescracks_auth::issue_token;
use lescracks_config::JwtConfig;
use lescracks_core::password::{hash_password_async, verify_against_dummy, verify_password_async};
use lescracks_core::AppError;
use lescracks_models::{
    Admin, AdminCredentials, LoginRequest, LoginResponse, RegisterAdminDto, UpdateProfileDto,
};

use crate::metrics::{track_login_failure, track_login_success, track_token_issued};
use crate::utils::background::spawn_best_effort;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const LAST_LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

const ADMIN_COLUMNS: &str = "id, name, email, last_login_at, created_at, updated_at";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::constraint("Email already in use");
    }
    AppError::database(e)
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db))]
    pub async fn find_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<AdminCredentials>, AppError> {
        let admin = sqlx::query_as::<_, AdminCredentials>(
            r#"SELECT id, name, email, password, last_login_at, created_at, updated_at
               FROM admins WHERE email = $1"#,
        )
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await?;

        Ok(admin)
    }

    /// Creates an admin. The password is hashed once, off the async executor.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterAdminDto) -> Result<Admin, AppError> {
        let password_hash = hash_password_async(dto.password).await?;

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (name, email, password) VALUES ($1, $2, $3) RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(&dto.name)
        .bind(normalize_email(&dto.email))
        .bind(&password_hash)
        .fetch_one(db)
        .await
        .map_err(email_taken)?;

        info!(admin_id = admin.id, "Admin registered");
        Ok(admin)
    }

    /// Checks credentials and mints a token.
    ///
    /// Unknown email and wrong password produce the same 401, and both cost one
    /// bcrypt verification.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(credentials) = Self::find_by_email(db, &dto.email).await? else {
            verify_against_dummy(dto.password).await;
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let valid = verify_password_async(dto.password, credentials.password.clone()).await?;
        if !valid {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let admin = credentials.into_admin();
        let token = issue_token(admin.id, &admin.email, jwt_config).map_err(AppError::auth)?;
        track_token_issued();
        track_login_success();

        let pool = db.clone();
        let admin_id = admin.id;
        spawn_best_effort("record_last_login", LAST_LOGIN_TIMEOUT, async move {
            sqlx::query("UPDATE admins SET last_login_at = NOW() WHERE id = $1")
                .bind(admin_id)
                .execute(&pool)
                .await
                .map(|_| ())
        });

        info!(admin_id = admin.id, "Admin logged in");
        Ok(LoginResponse { token, admin })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        admin_id: i32,
        dto: UpdateProfileDto,
    ) -> Result<Admin, AppError> {
        let new_password_hash = match dto.new_password {
            None => None,
            Some(new_password) => {
                let Some(current_password) = dto.current_password else {
                    return Err(AppError::validation(vec![
                        "current_password: is required to change the password".to_string(),
                    ]));
                };

                let stored: String =
                    sqlx::query_scalar("SELECT password FROM admins WHERE id = $1")
                        .bind(admin_id)
                        .fetch_optional(db)
                        .await?
                        .ok_or_else(|| AppError::not_found(anyhow!("Admin not found")))?;

                if !verify_password_async(current_password, stored).await? {
                    return Err(AppError::bad_request(anyhow!(
                        "Current password is incorrect"
                    )));
                }

                Some(hash_password_async(new_password).await?)
            }
        };

        let admin = sqlx::query_as::<_, Admin>(&format!(
            r#"UPDATE admins SET
                   name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   password = COALESCE($4, password),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            ADMIN_COLUMNS
        ))
        .bind(admin_id)
        .bind(dto.name.as_deref())
        .bind(dto.email.as_deref().map(normalize_email))
        .bind(new_password_hash)
        .fetch_optional(db)
        .await
        .map_err(email_taken)?
        .ok_or_else(|| AppError::not_found(anyhow!("Admin not found")))?;

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@LesCracks.com "), "admin@lescracks.com");
    }
}
