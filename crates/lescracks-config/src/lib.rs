//! # LesCracks Config
//!
//! Configuration types for the LesCracks API, loaded from environment variables.
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`database`]: connection pool sizing and the write-transaction time limit
//! - [`auth`]: whether self-registration of admins is open
//! - [`cors`]: allowed browser origins
//! - [`upload`]: where uploaded images live and how large they may be
//!
//! Every type has a `from_env()` constructor and a `from_vars(lookup)`
//! constructor that reads through an arbitrary lookup function instead of the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use lescracks_config::{JwtConfig, DatabaseConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let database_config = DatabaseConfig::from_env()?;
//! ```

pub mod auth;
pub mod cors;
pub mod database;
pub mod error;
pub mod jwt;
pub mod upload;

pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use upload::UploadConfig;

/// Reads the process environment, treating blank values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw,
        }),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    pub fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }
}
