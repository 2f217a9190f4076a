use crate::disk::DiskStorage;
use crate::inline::InlineStorage;
use crate::traits::{PayloadStorage, StorageResult, StoredPayload};
use crate::StorageBackend;
use lectern_core::models::Document;
use lectern_core::DocumentStorageConfig;
use std::path::{Path, PathBuf};

/// Outcome of a Disk → Inline migration attempt.
#[derive(Debug, Clone)]
pub enum Migration {
    /// The document was already inline; nothing changed.
    Unchanged(Document),
    /// Bytes were read from disk into `file_data` and the flag flipped.
    /// The recorded path is kept but ignored from now on.
    Migrated(Document),
}

impl Migration {
    pub fn into_document(self) -> Document {
        match self {
            Migration::Unchanged(doc) | Migration::Migrated(doc) => doc,
        }
    }
}

/// Both payload backends, dispatched on a document's backend flag.
#[derive(Debug, Clone)]
pub struct StorageBackends {
    disk: DiskStorage,
    inline: InlineStorage,
}

impl StorageBackends {
    pub async fn new(disk_root: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self {
            disk: DiskStorage::new(disk_root).await?,
            inline: InlineStorage::new(),
        })
    }

    /// Create the backends from configuration
    pub async fn from_config(config: &DocumentStorageConfig) -> StorageResult<Self> {
        Self::new(config.storage_path.clone()).await
    }

    pub fn backend(&self, backend: StorageBackend) -> &dyn PayloadStorage {
        match backend {
            StorageBackend::Disk => &self.disk,
            StorageBackend::Inline => &self.inline,
        }
    }

    pub async fn write(
        &self,
        backend: StorageBackend,
        stored_filename: &str,
        data: Vec<u8>,
        existing_path: Option<&Path>,
    ) -> StorageResult<StoredPayload> {
        self.backend(backend)
            .write(stored_filename, data, existing_path)
            .await
    }

    pub async fn read(&self, document: &Document) -> StorageResult<Vec<u8>> {
        self.backend(document.storage_backend).read(document).await
    }

    /// Disk → Inline: read the bytes from the recorded path, put them in the
    /// payload field, then flip the flag. Inline documents are returned as-is.
    ///
    /// Only the in-memory record changes; the caller persists it.
    pub async fn migrate_to_inline(&self, mut document: Document) -> StorageResult<Migration> {
        if document.storage_backend == StorageBackend::Inline {
            return Ok(Migration::Unchanged(document));
        }

        let data = self.disk.read(&document).await?;
        document.file_data = Some(data);
        document.storage_backend = StorageBackend::Inline;

        Ok(Migration::Migrated(document))
    }

    /// Write the document's current bytes to `target` without touching the
    /// document record or its backend.
    pub async fn export(&self, document: &Document, target: &Path) -> StorageResult<PathBuf> {
        let data = self.read(document).await?;
        DiskStorage::write_file(target, &data).await?;

        tracing::info!(
            document_id = %document.id,
            backend = %document.storage_backend,
            target = %target.display(),
            size_bytes = data.len(),
            "Document exported"
        );

        Ok(target.to_path_buf())
    }
}
