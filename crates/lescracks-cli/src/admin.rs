//! Admin account provisioning.

use sqlx::PgPool;
use validator::Validate;

use lescracks_core::hash_password;
use lescracks_models::RegisterAdminDto;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Creates an admin account. The email is stored trimmed and lowercased.
///
/// Returns the new admin id. Fails if the email is already registered.
pub async fn create_admin(db: &PgPool, name: &str, email: &str, password: &str) -> CliResult<i32> {
    let dto = RegisterAdminDto {
        name: name.trim().to_string(),
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    };
    dto.validate()?;

    let hashed_password =
        hash_password(&dto.password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO admins (name, email, password)
         VALUES ($1, $2, $3)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(&dto.name)
    .bind(&dto.email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    id.ok_or_else(|| "An admin with this email already exists".into())
}
