#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("JWT_SECRET must be at least {min} bytes, got {len}")]
    WeakSecret { min: usize, len: usize },
}
