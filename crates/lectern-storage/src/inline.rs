use crate::traits::{PayloadStorage, StorageError, StorageResult, StoredPayload};
use crate::StorageBackend;
use async_trait::async_trait;
use lectern_core::models::Document;
use std::path::Path;

/// Inline backend: the payload is a column of the document row.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStorage;

impl InlineStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadStorage for InlineStorage {
    async fn write(
        &self,
        _stored_filename: &str,
        data: Vec<u8>,
        _existing_path: Option<&Path>,
    ) -> StorageResult<StoredPayload> {
        Ok(StoredPayload {
            backend: StorageBackend::Inline,
            file_data: Some(data),
            file_path: None,
        })
    }

    /// Returns the payload column. An empty or missing payload is an integrity
    /// error, never zero-length content.
    async fn read(&self, document: &Document) -> StorageResult<Vec<u8>> {
        match document.file_data.as_ref() {
            Some(data) if !data.is_empty() => Ok(data.clone()),
            _ => Err(StorageError::MissingPayload(document.id.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Inline
    }
}
