//! Storage statistics over the document catalog

use lectern_core::models::StorageStats;
use lectern_core::AppError;
use lectern_db::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct StorageStatsAggregator {
    store: Arc<dyn DocumentStore>,
}

impl StorageStatsAggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Exact counts from the catalog. `average_document_size` divides inline
    /// bytes by the count of all documents (see [`StorageStats`]).
    pub async fn compute_stats(&self) -> Result<StorageStats, AppError> {
        let aggregates = self.store.aggregate_stats().await?;
        let stats = StorageStats::from(aggregates);

        tracing::debug!(
            total_documents = stats.total_documents,
            total_media_assets = stats.total_media_assets,
            disk_backed = stats.disk_backed_count,
            inline_backed = stats.inline_backed_count,
            total_inline_bytes = stats.total_inline_bytes,
            "Storage statistics computed"
        );

        Ok(stats)
    }
}
