use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::storage_types::StorageBackend;

/// Processing status of an ingested document.
///
/// Lectern only records whatever status it is given. Transitions
/// (`Uploaded -> Processing -> Completed | Failed`) are written by the
/// downstream parsing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "document_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Uploaded,
    Processing,
    Completed,
    Failed,
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentStatus::Uploaded => write!(f, "uploaded"),
            DocumentStatus::Processing => write!(f, "processing"),
            DocumentStatus::Completed => write!(f, "completed"),
            DocumentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uploaded" => Ok(DocumentStatus::Uploaded),
            "processing" => Ok(DocumentStatus::Processing),
            "completed" => Ok(DocumentStatus::Completed),
            "failed" => Ok(DocumentStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid document status: {}", s)),
        }
    }
}

/// A stored document including its inline payload, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_backend: StorageBackend,
    #[serde(skip_serializing, default)]
    pub file_data: Option<Vec<u8>>,
    pub file_path: Option<String>,
    pub has_embedded_media: bool,
    pub media_count: i32,
    pub status: DocumentStatus,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Split into the payload-free projection and the inline payload.
    pub fn into_parts(self) -> (DocumentMetadata, Option<Vec<u8>>) {
        let metadata = DocumentMetadata {
            id: self.id,
            original_filename: self.original_filename,
            stored_filename: self.stored_filename,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_backend: self.storage_backend,
            file_path: self.file_path,
            has_embedded_media: self.has_embedded_media,
            media_count: self.media_count,
            status: self.status,
            subject_id: self.subject_id,
            class_id: self.class_id,
            uploaded_by: self.uploaded_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (metadata, self.file_data)
    }

    pub fn metadata(&self) -> DocumentMetadata {
        self.clone().into_parts().0
    }
}

/// Document fields without any binary payload, for browse and list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_backend: StorageBackend,
    pub file_path: Option<String>,
    pub has_embedded_media: bool,
    pub media_count: i32,
    pub status: DocumentStatus,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Reattach a payload (used by stores that keep the payload separately).
    pub fn with_payload(self, file_data: Option<Vec<u8>>) -> Document {
        Document {
            id: self.id,
            original_filename: self.original_filename,
            stored_filename: self.stored_filename,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_backend: self.storage_backend,
            file_data,
            file_path: self.file_path,
            has_embedded_media: self.has_embedded_media,
            media_count: self.media_count,
            status: self.status,
            subject_id: self.subject_id,
            class_id: self.class_id,
            uploaded_by: self.uploaded_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Insert payload for a new document row.
///
/// `has_embedded_media` is not a field: stores derive it from `media_count`
/// so the two can never disagree at creation.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_backend: StorageBackend,
    pub file_data: Option<Vec<u8>>,
    pub file_path: Option<String>,
    pub media_count: i32,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub uploaded_by: Uuid,
}

impl NewDocument {
    pub fn has_embedded_media(&self) -> bool {
        self.media_count > 0
    }
}
