use serde::{Deserialize, Serialize};

/// Raw catalog aggregates as counted by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAggregates {
    pub total_documents: i64,
    pub total_media_assets: i64,
    pub disk_backed_count: i64,
    pub inline_backed_count: i64,
    /// Sum of declared `file_size` over inline-backed documents only.
    pub total_inline_bytes: i64,
}

/// Storage statistics reported to operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_documents: i64,
    pub total_media_assets: i64,
    pub disk_backed_count: i64,
    pub inline_backed_count: i64,
    pub total_inline_bytes: i64,
    pub average_document_size: i64,
}

impl From<CatalogAggregates> for StorageStats {
    /// The average divides inline bytes by *all* documents, not by inline
    /// documents. Historical reports were produced this way and consumers
    /// compare against them, so disk-backed documents pull the figure down.
    fn from(agg: CatalogAggregates) -> Self {
        let average_document_size = if agg.total_documents > 0 {
            agg.total_inline_bytes / agg.total_documents
        } else {
            0
        };

        StorageStats {
            total_documents: agg.total_documents,
            total_media_assets: agg.total_media_assets,
            disk_backed_count: agg.disk_backed_count,
            inline_backed_count: agg.inline_backed_count,
            total_inline_bytes: agg.total_inline_bytes,
            average_document_size,
        }
    }
}
