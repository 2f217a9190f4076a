use async_trait::async_trait;
use lectern_core::models::{
    CatalogAggregates, Document, DocumentFilter, DocumentMetadata, DocumentPage, DocumentStatus,
    MediaAsset, MediaAssetSummary, NewDocument, NewMediaAsset, Pagination,
};
use lectern_core::AppError;
use uuid::Uuid;

/// Trait for document catalog persistence
///
/// Every method is a single statement against the datastore; there is no
/// cross-method transaction. Lookups return `Ok(None)` for absent rows and
/// leave the `NotFound` decision to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document row with status `Uploaded`.
    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError>;

    /// Insert all media assets of one ingestion in a single statement.
    async fn insert_media_batch(
        &self,
        assets: Vec<NewMediaAsset>,
    ) -> Result<Vec<MediaAssetSummary>, AppError>;

    /// Full row, including the inline payload.
    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// Row without the payload column.
    async fn get_metadata(&self, id: Uuid) -> Result<Option<DocumentMetadata>, AppError>;

    /// Filtered page ordered `created_at DESC, id DESC`, plus total matches.
    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        pagination: Pagination,
    ) -> Result<DocumentPage, AppError>;

    /// Media of a document with bytes, ordered by `order_index`.
    async fn get_media_assets(&self, document_id: Uuid) -> Result<Vec<MediaAsset>, AppError>;

    /// Media of a document without bytes, ordered by `order_index`.
    async fn list_media(&self, document_id: Uuid) -> Result<Vec<MediaAssetSummary>, AppError>;

    async fn get_media_asset(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError>;

    /// Delete a document and, by cascade, its media. Returns whether a row was removed.
    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Option<DocumentMetadata>, AppError>;

    /// Store `data` as the inline payload and flip the backend flag, only if
    /// the row still exists and is still disk-backed. `None` means no row
    /// matched; the caller decides whether it was deleted or already inline.
    async fn set_inline_payload(
        &self,
        id: Uuid,
        data: &[u8],
    ) -> Result<Option<DocumentMetadata>, AppError>;

    /// All disk-backed documents, oldest first.
    async fn list_disk_backed(&self) -> Result<Vec<DocumentMetadata>, AppError>;

    async fn aggregate_stats(&self) -> Result<CatalogAggregates, AppError>;
}
