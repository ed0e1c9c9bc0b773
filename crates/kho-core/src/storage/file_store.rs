//! File-backed durable store: one JSON document per key

use super::DurableStore;
use crate::error::{KhoError, KhoResult, ResultExt};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

const FILE_EXTENSION: &str = "json";

/// Durable store writing `<base_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_dir`, creating the directory
    pub fn new(base_dir: impl AsRef<Path>) -> KhoResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir).with_context(|| {
                format!("Creating storage directory '{}'", base_dir.display())
            })?;
        }

        Ok(Self { base_dir })
    }

    /// Directory holding the store's files
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get file path for a durable key
    fn file_path(&self, key: &str) -> KhoResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

/// Map an IO failure on `key`'s file to a storage error
fn storage_error(key: &str) -> impl FnOnce(std::io::Error) -> KhoError + '_ {
    move |e| KhoError::storage_for_key(e.to_string(), key)
}

/// Keys become file names, so path separators and dot segments are refused
fn validate_key(key: &str) -> KhoResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(KhoError::invalid_field(
            format!("Invalid storage key: {:?}", key),
            "key",
        ))
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn read(&self, key: &str) -> KhoResult<Option<String>> {
        let path = self.file_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(key)(e)).context(format!("Reading '{}'", path.display())),
        }
    }

    async fn write(&self, key: &str, value: &str) -> KhoResult<()> {
        let path = self.file_path(key)?;
        let tmp_path = path.with_extension(format!("{}.tmp", FILE_EXTENSION));

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(storage_error(key))
            .with_context(|| format!("Creating storage directory '{}'", self.base_dir.display()))?;

        // Write-then-rename so a crash never leaves a half-written document
        fs::write(&tmp_path, value)
            .await
            .map_err(storage_error(key))
            .with_context(|| format!("Writing '{}'", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(storage_error(key))
            .with_context(|| format!("Replacing '{}'", path.display()))?;

        tracing::debug!("Persisted durable key {} to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> KhoResult<()> {
        let path = self.file_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(key)(e)).context(format!("Removing '{}'", path.display())),
        }
    }

    async fn keys(&self) -> KhoResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Listing storage directory '{}'", self.base_dir.display())
                });
            }
        };

        while let Some(entry) = dir.next_entry().await.context("Reading storage directory entry")? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
