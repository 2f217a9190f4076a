//! In-memory document store
//!
//! Mirrors the PostgreSQL store's semantics (cascade on delete, conditional
//! inline update, most-recent-first listing) without a database.

use async_trait::async_trait;
use chrono::Utc;
use lectern_core::models::{
    CatalogAggregates, Document, DocumentFilter, DocumentMetadata, DocumentPage, DocumentStatus,
    MediaAsset, MediaAssetSummary, NewDocument, NewMediaAsset, Pagination,
};
use lectern_core::{AppError, StorageBackend};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document_store::DocumentStore;

#[derive(Default)]
struct Tables {
    documents: HashMap<Uuid, Document>,
    media_assets: HashMap<Uuid, MediaAsset>,
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<Tables>,
    fail_next_document_insert: AtomicBool,
    fail_next_media_batch: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `insert_document` call fail without inserting anything.
    pub fn fail_next_document_insert(&self) {
        self.fail_next_document_insert.store(true, Ordering::SeqCst);
    }

    /// Make the next `insert_media_batch` call fail without inserting anything.
    pub fn fail_next_media_batch(&self) {
        self.fail_next_media_batch.store(true, Ordering::SeqCst);
    }

    /// Number of media rows across all documents.
    pub async fn media_row_count(&self) -> usize {
        self.tables.read().await.media_assets.len()
    }

    fn media_for(tables: &Tables, document_id: Uuid) -> Vec<&MediaAsset> {
        let mut assets: Vec<&MediaAsset> = tables
            .media_assets
            .values()
            .filter(|a| a.document_id == document_id)
            .collect();
        assets.sort_by_key(|a| a.order_index);
        assets
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        if self.fail_next_document_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal(
                "Injected document insert failure".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if tables.documents.contains_key(&document.id) {
            return Err(AppError::InvalidInput(format!(
                "Document {} already exists",
                document.id
            )));
        }

        let now = Utc::now();
        let row = Document {
            id: document.id,
            has_embedded_media: document.has_embedded_media(),
            original_filename: document.original_filename,
            stored_filename: document.stored_filename,
            file_type: document.file_type,
            file_size: document.file_size,
            storage_backend: document.storage_backend,
            file_data: document.file_data,
            file_path: document.file_path,
            media_count: document.media_count,
            status: DocumentStatus::Uploaded,
            subject_id: document.subject_id,
            class_id: document.class_id,
            uploaded_by: document.uploaded_by,
            created_at: now,
            updated_at: now,
        };
        tables.documents.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_media_batch(
        &self,
        assets: Vec<NewMediaAsset>,
    ) -> Result<Vec<MediaAssetSummary>, AppError> {
        if self.fail_next_media_batch.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal(
                "Injected media batch insert failure".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        // All-or-nothing, like a single INSERT statement
        if let Some(orphan) = assets
            .iter()
            .find(|a| !tables.documents.contains_key(&a.document_id))
        {
            return Err(AppError::DataIntegrity(format!(
                "Media asset references missing document {}",
                orphan.document_id
            )));
        }

        let now = Utc::now();
        let mut summaries = Vec::with_capacity(assets.len());
        for asset in assets {
            let row = MediaAsset {
                id: Uuid::new_v4(),
                document_id: asset.document_id,
                file_size: asset.file_size(),
                data: asset.data,
                filename: asset.filename,
                mime_type: asset.mime_type,
                order_index: asset.order_index,
                relationship_id: asset.relationship_id,
                created_at: now,
            };
            summaries.push(row.summary());
            tables.media_assets.insert(row.id, row);
        }
        summaries.sort_by_key(|s| s.order_index);
        Ok(summaries)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.tables.read().await.documents.get(&id).cloned())
    }

    async fn get_metadata(&self, id: Uuid) -> Result<Option<DocumentMetadata>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .documents
            .get(&id)
            .map(|d| d.metadata()))
    }

    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        pagination: Pagination,
    ) -> Result<DocumentPage, AppError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<DocumentMetadata> = tables
            .documents
            .values()
            .map(|d| d.metadata())
            .filter(|d| filter.matches(d))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok(DocumentPage {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    async fn get_media_assets(&self, document_id: Uuid) -> Result<Vec<MediaAsset>, AppError> {
        let tables = self.tables.read().await;
        Ok(Self::media_for(&tables, document_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn list_media(&self, document_id: Uuid) -> Result<Vec<MediaAssetSummary>, AppError> {
        let tables = self.tables.read().await;
        Ok(Self::media_for(&tables, document_id)
            .into_iter()
            .map(|a| a.summary())
            .collect())
    }

    async fn get_media_asset(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError> {
        Ok(self.tables.read().await.media_assets.get(&id).cloned())
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.documents.remove(&id).is_none() {
            return Ok(false);
        }
        tables.media_assets.retain(|_, a| a.document_id != id);
        Ok(true)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Option<DocumentMetadata>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.documents.get_mut(&id).map(|doc| {
            doc.status = status;
            doc.updated_at = Utc::now();
            doc.metadata()
        }))
    }

    async fn set_inline_payload(
        &self,
        id: Uuid,
        data: &[u8],
    ) -> Result<Option<DocumentMetadata>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .documents
            .get_mut(&id)
            .filter(|doc| doc.storage_backend == StorageBackend::Disk)
            .map(|doc| {
                doc.file_data = Some(data.to_vec());
                doc.storage_backend = StorageBackend::Inline;
                doc.updated_at = Utc::now();
                doc.metadata()
            }))
    }

    async fn list_disk_backed(&self) -> Result<Vec<DocumentMetadata>, AppError> {
        let tables = self.tables.read().await;
        let mut docs: Vec<DocumentMetadata> = tables
            .documents
            .values()
            .filter(|d| d.storage_backend == StorageBackend::Disk)
            .map(|d| d.metadata())
            .collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(docs)
    }

    async fn aggregate_stats(&self) -> Result<CatalogAggregates, AppError> {
        let tables = self.tables.read().await;
        let mut aggregates = CatalogAggregates {
            total_documents: tables.documents.len() as i64,
            total_media_assets: tables.media_assets.len() as i64,
            ..CatalogAggregates::default()
        };

        for doc in tables.documents.values() {
            match doc.storage_backend {
                StorageBackend::Disk => aggregates.disk_backed_count += 1,
                StorageBackend::Inline => {
                    aggregates.inline_backed_count += 1;
                    aggregates.total_inline_bytes += doc.file_size;
                }
            }
        }

        Ok(aggregates)
    }
}
