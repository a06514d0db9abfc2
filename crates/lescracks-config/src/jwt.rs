use crate::{ConfigError, env_lookup, parse_or};

pub const MIN_SECRET_BYTES: usize = 32;
pub const DEFAULT_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_secs: i64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    /// There is no fallback secret. A missing or short `JWT_SECRET` refuses to start.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                min: MIN_SECRET_BYTES,
                len: secret.len(),
            });
        }

        let expiry_secs = parse_or(&lookup, "JWT_EXPIRY_SECS", DEFAULT_EXPIRY_SECS)?;
        if expiry_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "JWT_EXPIRY_SECS",
                value: expiry_secs.to_string(),
            });
        }

        Ok(Self {
            secret,
            expiry_secs,
        })
    }
}
