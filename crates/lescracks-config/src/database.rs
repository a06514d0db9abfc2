//! Database connection settings.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | required |
//! | `DB_MAX_CONNECTIONS` | 10 |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | 5 |
//! | `DB_TRANSACTION_TIMEOUT_SECS` | 10 |

use std::time::Duration;

use crate::{ConfigError, env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Upper bound on a multi-statement write. Exceeding it rolls the write back.
    pub transaction_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            transaction_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_TRANSACTION_TIMEOUT_SECS",
                10,
            )?),
        })
    }

    /// Settings for an already-open pool, e.g. one handed out by a test harness.
    pub fn for_existing_pool(transaction_timeout: Duration) -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            transaction_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::vars;

    #[test]
    fn test_requires_url() {
        let err = DatabaseConfig::from_vars(vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("DATABASE_URL"));
    }

    #[test]
    fn test_defaults() {
        let config =
            DatabaseConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/lescracks")]))
                .unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.transaction_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_non_numeric_pool_size() {
        let err = DatabaseConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/lescracks"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                value: "lots".to_string()
            }
        );
    }
}
