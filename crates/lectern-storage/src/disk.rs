use crate::keys::generate_storage_key;
use crate::traits::{PayloadStorage, StorageError, StorageResult, StoredPayload};
use crate::StorageBackend;
use async_trait::async_trait;
use lectern_core::models::Document;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Disk backend: the document row records a filesystem path.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
}

impl DiskStorage {
    /// Create a new DiskStorage instance
    ///
    /// `base_path` is the root for files this backend places itself
    /// (e.g., "/var/lib/lectern/uploads"). Paths supplied by the upload
    /// collaborator may live anywhere.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(DiskStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage key to a path under the root, rejecting traversal.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        // Only real path components matter: "final..docx" is a plain name.
        let escapes = Path::new(storage_key)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if storage_key.is_empty() || escapes {
            return Err(StorageError::InvalidKey(format!(
                "Storage key escapes the storage root: {}",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Write `data` to `path`, creating parent directories and syncing.
    pub async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Read the bytes at a recorded path.
    pub async fn read_path(path: &Path) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();

        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.display().to_string()));
        }

        let data = fs::read(path).await.map_err(|source| StorageError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Disk storage read successful"
        );

        Ok(data)
    }
}

#[async_trait]
impl PayloadStorage for DiskStorage {
    async fn write(
        &self,
        stored_filename: &str,
        data: Vec<u8>,
        existing_path: Option<&Path>,
    ) -> StorageResult<StoredPayload> {
        // Bytes already placed by the upload collaborator; readability is
        // checked on read, not here.
        if let Some(path) = existing_path {
            return Ok(StoredPayload {
                backend: StorageBackend::Disk,
                file_data: None,
                file_path: Some(path.display().to_string()),
            });
        }

        let key = generate_storage_key(stored_filename)
            .ok_or_else(|| StorageError::InvalidKey(stored_filename.to_string()))?;
        let path = self.key_to_path(&key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        Self::write_file(&path, &data).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Disk storage write successful"
        );

        Ok(StoredPayload {
            backend: StorageBackend::Disk,
            file_data: None,
            file_path: Some(path.display().to_string()),
        })
    }

    async fn read(&self, document: &Document) -> StorageResult<Vec<u8>> {
        let path = document
            .file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StorageError::MissingPath(document.id.to_string()))?;

        Self::read_path(Path::new(path)).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Disk
    }
}
