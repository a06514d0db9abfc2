//! Storage backend for uploaded images.
//!
//! Images are addressed by a storage key such as `images/<uuid>.png`. The key
//! is what the database stores; the public URL is derived from it.
//!
//! ```ignore
//! use lescracks_core::file_storage::{FileStorage, LocalFileStorage, image_extension};
//!
//! let storage = LocalFileStorage::new("./uploads".into(), "/uploads".to_string());
//! let ext = image_extension("image/png")?;
//! let key = storage.save(&format!("images/{}.{}", uuid, ext), &bytes).await?;
//! let url = storage.url_for(&key)?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types and the extension each is stored under.
pub const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub trait FileStorage: Send + Sync {
    /// Writes `content` under `key` and returns the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Removes the file under `key`. A missing file is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    fn url_for(&self, key: &str) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("Unsupported image type '{received}'. Allowed types: {}", allowed_types().join(", "))]
    UnsupportedType { received: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True when the upload itself was unacceptable, as opposed to a disk failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

fn allowed_types() -> Vec<&'static str> {
    IMAGE_TYPES.iter().map(|(mime, _)| *mime).collect()
}

/// Maps an accepted image content type to its file extension.
pub fn image_extension(content_type: &str) -> Result<&'static str, StorageError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, ext)| *ext)
        .ok_or(StorageError::UnsupportedType {
            received: content_type.to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    fn check_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.starts_with('/') || key.starts_with('\\') || key.contains("..") {
            return Err(StorageError::InvalidKey(
                "key must be a non-empty relative path".to_string(),
            ));
        }

        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.');
        if !key.chars().all(allowed) {
            return Err(StorageError::InvalidKey(format!(
                "'{}' contains invalid characters",
                key
            )));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::check_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::TooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let path = self.base_dir.join(key);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, content).await?;

            tracing::debug!(key = %key, bytes = content.len(), "Stored upload");
            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::check_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn url_for(&self, key: &str) -> Result<String, StorageError> {
        Self::check_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}
