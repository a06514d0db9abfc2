use sqlx::PgPool;

use lescracks_config::{AuthConfig, CorsConfig, DatabaseConfig, JwtConfig, UploadConfig};
use lescracks_core::file_storage::LocalFileStorage;
use lescracks_db::{init_db_pool, run_migrations};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub database_config: DatabaseConfig,
    pub auth_config: AuthConfig,
    pub cors_config: CorsConfig,
    pub upload_config: UploadConfig,
    pub storage: LocalFileStorage,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        database_config: DatabaseConfig,
        auth_config: AuthConfig,
        cors_config: CorsConfig,
        upload_config: UploadConfig,
    ) -> Self {
        let storage = LocalFileStorage::with_max_size(
            upload_config.dir.clone(),
            upload_config.base_url.clone(),
            upload_config.max_bytes,
        );

        Self {
            db,
            jwt_config,
            database_config,
            auth_config,
            cors_config,
            upload_config,
            storage,
        }
    }
}

/// Loads configuration, connects to Postgres and applies migrations.
///
/// Fails without touching the database when `JWT_SECRET` is missing or weak.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;
    let cors_config = CorsConfig::from_env();
    let upload_config = UploadConfig::from_env()?;

    let db = init_db_pool(&database_config).await?;
    run_migrations(&db).await?;

    Ok(AppState::new(
        db,
        jwt_config,
        database_config,
        auth_config,
        cors_config,
        upload_config,
    ))
}
