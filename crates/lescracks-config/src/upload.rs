use std::path::PathBuf;

use crate::{ConfigError, env_lookup, parse_or};

pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// URL prefix under which `dir` is served.
    pub base_url: String,
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            base_url: lookup("UPLOAD_BASE_URL").unwrap_or_else(|| "/uploads".to_string()),
            max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", DEFAULT_MAX_BYTES)?,
        })
    }
}
