use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One embedded binary extracted from a document's container.
///
/// Exclusively owned by its document; removed only by cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: Uuid,
    pub document_id: Uuid,
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub order_index: i32,
    pub relationship_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaAsset {
    pub fn summary(&self) -> MediaAssetSummary {
        MediaAssetSummary {
            id: self.id,
            document_id: self.document_id,
            filename: self.filename.clone(),
            mime_type: self.mime_type.clone(),
            file_size: self.file_size,
            order_index: self.order_index,
            relationship_id: self.relationship_id.clone(),
            created_at: self.created_at,
        }
    }
}

/// Media asset fields without the binary payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAssetSummary {
    pub id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub order_index: i32,
    pub relationship_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for one media asset in an ingestion batch.
#[derive(Debug, Clone)]
pub struct NewMediaAsset {
    pub document_id: Uuid,
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub order_index: i32,
    pub relationship_id: Option<String>,
}

impl NewMediaAsset {
    pub fn file_size(&self) -> i64 {
        self.data.len() as i64
    }
}
