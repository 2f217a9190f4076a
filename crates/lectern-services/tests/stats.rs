mod helpers;

use helpers::*;
use lectern_core::models::StorageStats;
use lectern_core::StorageBackend;
use lectern_db::DocumentStore;
use lectern_services::StorageStatsAggregator;
use std::sync::Arc;

#[tokio::test]
async fn test_stats_mixed_backends() {
    let t = setup_catalog().await;
    let aggregator = StorageStatsAggregator::new(t.store.clone() as Arc<dyn DocumentStore>);

    t.catalog
        .ingest(docx_request(vec![b'x'; 1000]))
        .await
        .unwrap();
    t.catalog
        .ingest(
            docx_request(b"%PDF-1.4".to_vec())
                .with_backend(StorageBackend::Disk)
                .with_declared_size(5000),
        )
        .await
        .unwrap();

    let stats = aggregator.compute_stats().await.unwrap();

    assert_eq!(stats.total_documents, 2);
    assert_eq!(stats.disk_backed_count, 1);
    assert_eq!(stats.inline_backed_count, 1);
    assert_eq!(stats.total_inline_bytes, 1000);
    assert_eq!(stats.average_document_size, 500);
}

#[tokio::test]
async fn test_stats_empty_catalog() {
    let t = setup_catalog().await;
    let aggregator = StorageStatsAggregator::new(t.store.clone() as Arc<dyn DocumentStore>);

    let stats = aggregator.compute_stats().await.unwrap();

    assert_eq!(stats, StorageStats::default());
}

#[tokio::test]
async fn test_stats_follow_media_and_migration() {
    let t = setup_catalog().await;
    let aggregator = StorageStatsAggregator::new(t.store.clone() as Arc<dyn DocumentStore>);
    let data = docx_with_png_and_jpeg();
    let declared = data.len() as i64;

    let doc = t
        .catalog
        .ingest(docx_request(data).with_backend(StorageBackend::Disk))
        .await
        .unwrap();

    let before = aggregator.compute_stats().await.unwrap();
    assert_eq!(before.total_media_assets, 2);
    assert_eq!(before.total_inline_bytes, 0);

    t.catalog.migrate_to_inline(doc.id).await.unwrap();
    let after = aggregator.compute_stats().await.unwrap();
    assert_eq!(after.disk_backed_count, 0);
    assert_eq!(after.inline_backed_count, 1);
    assert_eq!(after.total_inline_bytes, declared);

    t.catalog.delete(doc.id).await.unwrap();
    let empty = aggregator.compute_stats().await.unwrap();
    assert_eq!(empty.total_documents, 0);
    assert_eq!(empty.total_media_assets, 0);
}
