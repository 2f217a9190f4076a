use lectern_core::models::{DocumentMetadata, MediaAsset};
use lectern_core::StorageBackend;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// An upload handed over by the external upload collaborator.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub declared_mime_type: String,
    /// Size as declared by the uploader; stored as-is.
    pub declared_size: i64,
    pub uploaded_by: Uuid,
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    /// Falls back to the configured default backend.
    pub backend: Option<StorageBackend>,
    /// Where the collaborator already wrote the bytes (disk backend only).
    pub file_path: Option<PathBuf>,
}

impl IngestRequest {
    pub fn new(
        data: Vec<u8>,
        original_filename: impl Into<String>,
        declared_mime_type: impl Into<String>,
        uploaded_by: Uuid,
    ) -> Self {
        Self {
            declared_size: data.len() as i64,
            data,
            original_filename: original_filename.into(),
            declared_mime_type: declared_mime_type.into(),
            uploaded_by,
            subject_id: None,
            class_id: None,
            backend: None,
            file_path: None,
        }
    }

    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_declared_size(mut self, declared_size: i64) -> Self {
        self.declared_size = declared_size;
        self
    }

    pub fn with_subject(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_class(mut self, class_id: Uuid) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }
}

/// Metadata, primary payload and every media asset of one document.
#[derive(Debug, Clone, Serialize)]
pub struct FullDocument {
    pub document: DocumentMetadata,
    #[serde(skip_serializing)]
    pub payload: Vec<u8>,
    /// Ordered by `order_index`.
    pub media: Vec<MediaAsset>,
}

/// Unique on-disk name: document id plus a filesystem-safe original name.
pub fn generate_stored_filename(id: Uuid, original_filename: &str) -> String {
    let basename = original_filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let safe: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim_start_matches('.');

    if safe.is_empty() {
        format!("{}-document", id.simple())
    } else {
        format!("{}-{}", id.simple(), safe)
    }
}
