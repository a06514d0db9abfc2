use crate::{ConfigError, env_lookup, parse_or};

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// When false, `POST /api/auth/register` answers 403.
    pub allow_registration: bool,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            allow_registration: parse_or(&lookup, "ALLOW_ADMIN_REGISTRATION", false)?,
        })
    }
}
