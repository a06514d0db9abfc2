//! Time-bounded write transactions.
//!
//! Multi-statement writes follow one shape:
//!
//! ```ignore
//! let write = async {
//!     let mut tx = db.begin().await?;
//!     let result = write_course(&mut tx, &dto).await;
//!     finish(tx, result).await
//! };
//! let id = run_bounded(limit, write)
//!     .await
//!     .map_err(|e| e.into_app_error("Course", "Invalid category or image ID"))?;
//! ```
//!
//! On error the transaction is rolled back before the error leaves `finish`.
//! On timeout the future, and with it the transaction, is dropped; sqlx rolls
//! back a dropped transaction before the connection goes back to the pool.

use std::future::Future;
use std::time::Duration;

use sqlx::{Postgres, Transaction};
use tracing::{error, warn};

use lescracks_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("write did not complete within {0:?}")]
    TimedOut(Duration),
}

impl WriteError {
    /// Maps storage failures onto the HTTP error taxonomy.
    ///
    /// `entity` names the row for 404 and uniqueness messages;
    /// `invalid_reference` is the message for a foreign-key violation.
    pub fn into_app_error(self, entity: &str, invalid_reference: &str) -> AppError {
        match self {
            WriteError::Database(sqlx::Error::RowNotFound) => {
                AppError::not_found(anyhow::anyhow!("{} not found", entity))
            }
            WriteError::Database(sqlx::Error::Database(db_err))
                if db_err.is_foreign_key_violation() =>
            {
                warn!(constraint = ?db_err.constraint(), "Foreign key violation");
                AppError::constraint(invalid_reference)
            }
            WriteError::Database(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation() =>
            {
                AppError::constraint(format!("{} already exists", entity))
            }
            WriteError::Database(e) => AppError::database(e),
            WriteError::TimedOut(limit) => {
                error!(limit_ms = limit.as_millis() as u64, entity, "Write transaction timed out");
                AppError::internal(anyhow::anyhow!("{} write timed out after {:?}", entity, limit))
            }
        }
    }
}

/// Awaits `work` for at most `limit`.
pub async fn run_bounded<T, F>(limit: Duration, work: F) -> Result<T, WriteError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result.map_err(WriteError::from),
        Err(_) => Err(WriteError::TimedOut(limit)),
    }
}

/// Commits on success. On failure rolls back first, then hands back the original error.
pub async fn finish<T>(
    tx: Transaction<'static, Postgres>,
    result: Result<T, sqlx::Error>,
) -> Result<T, sqlx::Error> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed; connection will be discarded");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_run_bounded_passes_result_through() {
        let value = run_bounded(Duration::from_secs(1), async { Ok::<_, sqlx::Error>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        };
        let err = run_bounded(Duration::from_millis(10), slow).await.unwrap_err();
        assert!(matches!(err, WriteError::TimedOut(_)));
    }

    #[test]
    fn test_row_not_found_is_404() {
        let err = WriteError::Database(sqlx::Error::RowNotFound)
            .into_app_error("Course", "Invalid category or image ID");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.to_body().message, "Course not found");
    }

    #[test]
    fn test_timeout_is_internal() {
        let err = WriteError::TimedOut(Duration::from_millis(5)).into_app_error("Course", "x");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_body().message, "Internal server error");
    }
}
