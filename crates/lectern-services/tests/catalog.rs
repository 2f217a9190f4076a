mod helpers;

use async_trait::async_trait;
use helpers::*;
use lectern_core::models::{
    CatalogAggregates, Document, DocumentFilter, DocumentMetadata, DocumentPage, DocumentStatus,
    MediaAsset, MediaAssetSummary, NewDocument, NewMediaAsset, Pagination,
};
use lectern_core::{AppError, StorageBackend};
use lectern_db::{DocumentStore, InMemoryDocumentStore};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_metadata_excludes_payload() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(docx_with_png_and_jpeg()))
        .await
        .unwrap();

    let metadata = t.catalog.get_metadata(doc.id).await.unwrap();
    let json = serde_json::to_value(&metadata).unwrap();

    assert_eq!(metadata.id, doc.id);
    assert_eq!(metadata.media_count, 2);
    assert!(json.get("file_data").is_none());
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let t = setup_catalog().await;
    let id = Uuid::new_v4();

    assert!(matches!(t.catalog.get_metadata(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(t.catalog.get_full(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(t.catalog.delete(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(t.catalog.list_media(id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        t.catalog.get_media_asset(id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_cascades_to_media() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(docx_with_png_and_jpeg()))
        .await
        .unwrap();
    let media = t.catalog.list_media(doc.id).await.unwrap();
    assert_eq!(media.len(), 2);

    t.catalog.delete(doc.id).await.unwrap();

    for asset in &media {
        assert!(matches!(
            t.catalog.get_media_asset(asset.id).await,
            Err(AppError::NotFound(_))
        ));
    }
    assert!(matches!(
        t.catalog.get_metadata(doc.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(t.store.media_row_count().await, 0);
}

#[tokio::test]
async fn test_delete_leaves_disk_file() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    let path = doc.file_path.clone().unwrap();

    t.catalog.delete(doc.id).await.unwrap();

    assert!(std::path::Path::new(&path).exists());
}

#[tokio::test]
async fn test_get_full_disk_file_missing_is_unavailable() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    std::fs::remove_file(doc.file_path.clone().unwrap()).unwrap();

    let result = t.catalog.get_full(doc.id).await;

    assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
}

#[tokio::test]
async fn test_get_full_empty_inline_payload_is_integrity_error() {
    let t = setup_catalog().await;
    // Ingest refuses empty inline payloads, so write the damaged row directly
    let doc = t
        .store
        .insert_document(NewDocument {
            id: Uuid::new_v4(),
            original_filename: "damaged.docx".to_string(),
            stored_filename: "damaged.docx".to_string(),
            file_type: "application/octet-stream".to_string(),
            file_size: 0,
            storage_backend: StorageBackend::Inline,
            file_data: Some(Vec::new()),
            file_path: None,
            media_count: 0,
            subject_id: None,
            class_id: None,
            uploaded_by: Uuid::new_v4(),
        })
        .await
        .unwrap();

    let result = t.catalog.get_full(doc.id).await;

    assert!(matches!(result, Err(AppError::DataIntegrity(_))));
}

#[tokio::test]
async fn test_list_filters_paginates_newest_first() {
    let t = setup_catalog().await;
    let uploader = Uuid::new_v4();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let mut request = docx_request(b"%PDF-1.4".to_vec());
        request.uploaded_by = uploader;
        ids.push(t.catalog.ingest(request).await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    t.catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    let filter = DocumentFilter {
        uploaded_by: Some(uploader),
        ..DocumentFilter::default()
    };
    let first = t.catalog.list(&filter, 1, 2).await.unwrap();
    let second = t.catalog.list(&filter, 2, 2).await.unwrap();
    let third = t.catalog.list(&filter, 3, 2).await.unwrap();

    assert_eq!(first.total, 5);
    let listed: Vec<Uuid> = first
        .items
        .iter()
        .chain(second.items.iter())
        .chain(third.items.iter())
        .map(|d| d.id)
        .collect();
    let newest_first: Vec<Uuid> = ids.iter().rev().copied().collect();
    assert_eq!(listed, newest_first);

    let all = t.catalog.list(&DocumentFilter::default(), 0, 1000).await.unwrap();
    assert_eq!(all.page, 1);
    assert_eq!(all.page_size, 100);
    assert_eq!(all.total, 6);
}

#[tokio::test]
async fn test_list_by_status() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()))
        .await
        .unwrap();
    t.catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    let updated = t
        .catalog
        .update_status(doc.id, DocumentStatus::Processing)
        .await
        .unwrap();
    assert_eq!(updated.status, DocumentStatus::Processing);

    let filter = DocumentFilter {
        status: Some(DocumentStatus::Processing),
        ..DocumentFilter::default()
    };
    let page = t.catalog.list(&filter, 1, 20).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, doc.id);

    assert!(matches!(
        t.catalog
            .update_status(Uuid::new_v4(), DocumentStatus::Failed)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_migrate_disk_to_inline() {
    let t = setup_catalog().await;
    let data = docx_with_png_and_jpeg();
    let doc = t
        .catalog
        .ingest(docx_request(data.clone()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();

    let migrated = t.catalog.migrate_to_inline(doc.id).await.unwrap();

    assert_eq!(migrated.storage_backend, StorageBackend::Inline);
    assert_eq!(migrated.file_path, doc.file_path);
    let full = t.catalog.get_full(doc.id).await.unwrap();
    assert_eq!(full.payload, data);

    // Second call is a no-op
    let again = t.catalog.migrate_to_inline(doc.id).await.unwrap();
    assert_eq!(again, migrated);
}

#[tokio::test]
async fn test_migrate_unreadable_file_keeps_disk_flag() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    std::fs::remove_file(doc.file_path.clone().unwrap()).unwrap();

    let result = t.catalog.migrate_to_inline(doc.id).await;

    assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
    let metadata = t.catalog.get_metadata(doc.id).await.unwrap();
    assert_eq!(metadata.storage_backend, StorageBackend::Disk);
}

#[tokio::test]
async fn test_migrate_empty_file_keeps_disk_flag() {
    let t = setup_catalog().await;
    let doc = t
        .catalog
        .ingest(docx_request(Vec::new()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();

    let result = t.catalog.migrate_to_inline(doc.id).await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    let metadata = t.catalog.get_metadata(doc.id).await.unwrap();
    assert_eq!(metadata.storage_backend, StorageBackend::Disk);
}

#[tokio::test]
async fn test_migrate_all_inline_reports_failures() {
    let t = setup_catalog().await;
    let good = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4 good".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    let broken = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4 broken".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    t.catalog
        .ingest(docx_request(b"%PDF-1.4 inline".to_vec()))
        .await
        .unwrap();
    std::fs::remove_file(broken.file_path.clone().unwrap()).unwrap();

    let report = t.catalog.migrate_all_inline().await.unwrap();

    assert_eq!(report.migrated, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, broken.id);
    assert!(report.has_failures());
    let metadata = t.catalog.get_metadata(good.id).await.unwrap();
    assert_eq!(metadata.storage_backend, StorageBackend::Inline);
}

#[tokio::test]
async fn test_export_is_non_mutating() {
    let t = setup_catalog().await;
    let data = docx_with_png_and_jpeg();
    let doc = t
        .catalog
        .ingest(docx_request(data.clone()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();
    let target = t.dir.path().join("exports").join("nested").join("copy.docx");

    let written = t.catalog.export_to_path(doc.id, &target).await.unwrap();

    assert_eq!(written, target);
    assert_eq!(std::fs::read(&target).unwrap(), data);
    let metadata = t.catalog.get_metadata(doc.id).await.unwrap();
    assert_eq!(metadata.storage_backend, StorageBackend::Disk);
    assert_eq!(metadata.file_path, doc.file_path);
}

/// Deletes the row right before the conditional inline update runs, the way
/// a concurrent `delete` would.
struct DeleteDuringMigration {
    inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for DeleteDuringMigration {
    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        self.inner.insert_document(document).await
    }

    async fn insert_media_batch(
        &self,
        assets: Vec<NewMediaAsset>,
    ) -> Result<Vec<MediaAssetSummary>, AppError> {
        self.inner.insert_media_batch(assets).await
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        self.inner.get_document(id).await
    }

    async fn get_metadata(&self, id: Uuid) -> Result<Option<DocumentMetadata>, AppError> {
        self.inner.get_metadata(id).await
    }

    async fn list_documents(
        &self,
        filter: &DocumentFilter,
        pagination: Pagination,
    ) -> Result<DocumentPage, AppError> {
        self.inner.list_documents(filter, pagination).await
    }

    async fn get_media_assets(&self, document_id: Uuid) -> Result<Vec<MediaAsset>, AppError> {
        self.inner.get_media_assets(document_id).await
    }

    async fn list_media(&self, document_id: Uuid) -> Result<Vec<MediaAssetSummary>, AppError> {
        self.inner.list_media(document_id).await
    }

    async fn get_media_asset(&self, id: Uuid) -> Result<Option<MediaAsset>, AppError> {
        self.inner.get_media_asset(id).await
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_document(id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Option<DocumentMetadata>, AppError> {
        self.inner.update_status(id, status).await
    }

    async fn set_inline_payload(
        &self,
        id: Uuid,
        data: &[u8],
    ) -> Result<Option<DocumentMetadata>, AppError> {
        self.inner.delete_document(id).await?;
        self.inner.set_inline_payload(id, data).await
    }

    async fn list_disk_backed(&self) -> Result<Vec<DocumentMetadata>, AppError> {
        self.inner.list_disk_backed().await
    }

    async fn aggregate_stats(&self) -> Result<CatalogAggregates, AppError> {
        self.inner.aggregate_stats().await
    }
}

#[tokio::test]
async fn test_migrate_racing_delete_does_not_resurrect() {
    let store = Arc::new(DeleteDuringMigration {
        inner: InMemoryDocumentStore::new(),
    });
    let t = setup_catalog_with_store(
        store.clone() as Arc<dyn DocumentStore>,
        Arc::new(InMemoryDocumentStore::new()),
    )
    .await;
    let doc = t
        .catalog
        .ingest(docx_request(b"%PDF-1.4".to_vec()).with_backend(StorageBackend::Disk))
        .await
        .unwrap();

    let result = t.catalog.migrate_to_inline(doc.id).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(store.inner.get_document(doc.id).await.unwrap().is_none());
}
