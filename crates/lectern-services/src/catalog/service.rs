use lectern_core::models::{
    Document, DocumentFilter, DocumentMetadata, DocumentPage, DocumentStatus, MediaAsset,
    MediaAssetSummary, NewDocument, NewMediaAsset, Pagination,
};
use lectern_core::{AppError, DocumentStorageConfig, StorageBackend};
use lectern_db::DocumentStore;
use lectern_processing::{ContainerParser, DocumentFormat, ExtractionOutcome, MediaCandidate};
use lectern_storage::{Migration, StorageBackends};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::request::{generate_stored_filename, FullDocument, IngestRequest};

/// Remove a file the disk backend placed for a row that was never written.
async fn discard_placed_file(path: &str) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path, error = %e, "Failed to remove orphaned document file");
    }
}

/// Counts from a bulk Disk → Inline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkMigrationReport {
    pub migrated: usize,
    /// Deleted or already migrated while the run was in progress.
    pub skipped: usize,
    pub failed: Vec<(Uuid, String)>,
}

impl BulkMigrationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Document catalog service
///
/// Owns no state of its own: the store handle and the payload backends are
/// injected and every call stands alone.
#[derive(Clone)]
pub struct DocumentCatalog {
    store: Arc<dyn DocumentStore>,
    backends: StorageBackends,
    parser: ContainerParser,
    default_backend: StorageBackend,
    max_document_size_bytes: usize,
}

impl DocumentCatalog {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        backends: StorageBackends,
        config: &DocumentStorageConfig,
    ) -> Self {
        Self {
            store,
            backends,
            parser: ContainerParser::new(),
            default_backend: config.default_backend,
            max_document_size_bytes: config.max_document_size_bytes,
        }
    }

    pub fn with_parser(mut self, parser: ContainerParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Ingest an uploaded document and the media embedded in it.
    ///
    /// The document row is written first, then all media in one batch. A
    /// failed batch does not roll the document back: it is logged and the
    /// document is still returned, with `media_count` reflecting what was
    /// extracted.
    #[tracing::instrument(skip(self, request), fields(filename = %request.original_filename, size_bytes = request.data.len()))]
    pub async fn ingest(&self, request: IngestRequest) -> Result<Document, AppError> {
        let start = Instant::now();

        if request.data.len() > self.max_document_size_bytes {
            return Err(AppError::PayloadTooLarge {
                size: request.data.len(),
                limit: self.max_document_size_bytes,
            });
        }
        if request.original_filename.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "original_filename must not be empty".to_string(),
            ));
        }
        if request.declared_size < 0 {
            return Err(AppError::InvalidInput(format!(
                "declared size must not be negative: {}",
                request.declared_size
            )));
        }

        let backend = request.backend.unwrap_or(self.default_backend);
        if backend == StorageBackend::Inline && request.data.is_empty() {
            return Err(AppError::InvalidInput(
                "inline upload must not be empty".to_string(),
            ));
        }

        let candidates = self.extract_candidates(&request.data).await;
        let media_count = i32::try_from(candidates.len()).map_err(|_| {
            AppError::InvalidInput(format!("too many embedded media: {}", candidates.len()))
        })?;

        let id = Uuid::new_v4();
        let stored_filename = generate_stored_filename(id, &request.original_filename);

        let stored = self
            .backends
            .write(
                backend,
                &stored_filename,
                request.data,
                request.file_path.as_deref(),
            )
            .await?;
        let placed_file = match (backend, &request.file_path) {
            (StorageBackend::Disk, None) => stored.file_path.clone(),
            _ => None,
        };

        let inserted = self
            .store
            .insert_document(NewDocument {
                id,
                original_filename: request.original_filename,
                stored_filename,
                file_type: request.declared_mime_type,
                file_size: request.declared_size,
                storage_backend: stored.backend,
                file_data: stored.file_data,
                file_path: stored.file_path,
                media_count,
                subject_id: request.subject_id,
                class_id: request.class_id,
                uploaded_by: request.uploaded_by,
            })
            .await;

        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                if let Some(path) = placed_file {
                    discard_placed_file(&path).await;
                }
                return Err(e);
            }
        };

        if !candidates.is_empty() {
            let assets: Vec<NewMediaAsset> = candidates
                .into_iter()
                .map(|c| NewMediaAsset {
                    document_id: id,
                    data: c.data,
                    filename: c.filename,
                    mime_type: c.mime_type,
                    order_index: c.order_index,
                    relationship_id: c.relationship_id,
                })
                .collect();

            if let Err(e) = self.store.insert_media_batch(assets).await {
                tracing::error!(
                    document_id = %id,
                    media_count,
                    error = %e,
                    "Media batch insert failed after document commit; document kept without media rows"
                );
            }
        }

        tracing::info!(
            document_id = %id,
            backend = %document.storage_backend,
            media_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document ingested"
        );

        Ok(document)
    }

    /// Parse on the blocking pool; anything that is not a ZIP package has no media.
    async fn extract_candidates(&self, data: &[u8]) -> Vec<MediaCandidate> {
        let format = DocumentFormat::detect(data);
        if !format.is_container() {
            tracing::debug!(format = %format, "Not a container, skipping media extraction");
            return Vec::new();
        }

        let outcome = self.parser.extract_async(data.to_vec()).await;
        if let ExtractionOutcome::Degraded { candidates, reason } = &outcome {
            tracing::warn!(
                reason = %reason,
                recovered = candidates.len(),
                "Media extraction degraded"
            );
        }
        outcome.into_candidates()
    }

    /// Document fields without the payload.
    pub async fn get_metadata(&self, id: Uuid) -> Result<DocumentMetadata, AppError> {
        self.store
            .get_metadata(id)
            .await?
            .ok_or_else(|| AppError::not_found_document(id))
    }

    /// Metadata, payload bytes through the document's backend, and all media.
    pub async fn get_full(&self, id: Uuid) -> Result<FullDocument, AppError> {
        let document = self
            .store
            .get_document(id)
            .await?
            .ok_or_else(|| AppError::not_found_document(id))?;

        let payload = self.backends.read(&document).await?;
        let media = self.store.get_media_assets(id).await?;

        Ok(FullDocument {
            document: document.into_parts().0,
            payload,
            media,
        })
    }

    pub async fn list(
        &self,
        filter: &DocumentFilter,
        page: u32,
        page_size: u32,
    ) -> Result<DocumentPage, AppError> {
        self.store
            .list_documents(filter, Pagination::new(page, page_size))
            .await
    }

    /// Remove the document and its media. Disk files are left in place.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_document(id).await? {
            return Err(AppError::not_found_document(id));
        }

        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<DocumentMetadata, AppError> {
        let document = self
            .store
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found_document(id))?;

        tracing::debug!(document_id = %id, status = %status, "Document status updated");
        Ok(document)
    }

    /// Move a disk-backed document's bytes into its row. Inline documents are
    /// returned unchanged.
    pub async fn migrate_to_inline(&self, id: Uuid) -> Result<DocumentMetadata, AppError> {
        let document = self
            .store
            .get_document(id)
            .await?
            .ok_or_else(|| AppError::not_found_document(id))?;

        let migrated = match self.backends.migrate_to_inline(document).await? {
            Migration::Unchanged(document) => return Ok(document.into_parts().0),
            Migration::Migrated(document) => document,
        };

        let data = migrated.file_data.as_deref().ok_or_else(|| {
            AppError::Internal(format!("Migrated document {} has no payload", id))
        })?;
        if data.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Document {} has an empty file and cannot be stored inline",
                id
            )));
        }

        if let Some(updated) = self.store.set_inline_payload(id, data).await? {
            tracing::info!(
                document_id = %id,
                size_bytes = data.len(),
                "Document migrated to inline storage"
            );
            return Ok(updated);
        }

        // The conditional update matched nothing: the row was deleted or
        // migrated concurrently.
        match self.store.get_metadata(id).await? {
            None => Err(AppError::not_found_document(id)),
            Some(current) if current.storage_backend == StorageBackend::Inline => Ok(current),
            Some(_) => Err(AppError::Internal(format!(
                "Inline update for document {} matched no row",
                id
            ))),
        }
    }

    /// Migrate every disk-backed document, continuing past individual failures.
    pub async fn migrate_all_inline(&self) -> Result<BulkMigrationReport, AppError> {
        let candidates = self.store.list_disk_backed().await?;
        let mut report = BulkMigrationReport::default();

        tracing::info!(count = candidates.len(), "Starting bulk migration to inline storage");

        for document in candidates {
            match self.migrate_to_inline(document.id).await {
                Ok(_) => report.migrated += 1,
                Err(AppError::NotFound(_)) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(document_id = %document.id, error = %e, "Migration failed");
                    report.failed.push((document.id, e.to_string()));
                }
            }
        }

        tracing::info!(
            migrated = report.migrated,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Bulk migration finished"
        );

        Ok(report)
    }

    /// Write the document's current bytes to `target`. The record is untouched.
    pub async fn export_to_path(&self, id: Uuid, target: &Path) -> Result<PathBuf, AppError> {
        let document = self
            .store
            .get_document(id)
            .await?
            .ok_or_else(|| AppError::not_found_document(id))?;

        Ok(self.backends.export(&document, target).await?)
    }

    pub async fn get_media_asset(&self, id: Uuid) -> Result<MediaAsset, AppError> {
        self.store
            .get_media_asset(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media asset {} not found", id)))
    }

    /// Media of a document without bytes, ordered by `order_index`.
    pub async fn list_media(&self, document_id: Uuid) -> Result<Vec<MediaAssetSummary>, AppError> {
        // Distinguish "no media" from "no document"
        self.get_metadata(document_id).await?;
        self.store.list_media(document_id).await
    }
}
