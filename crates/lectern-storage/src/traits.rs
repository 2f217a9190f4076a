//! Payload storage abstraction
//!
//! Every backend implements [`PayloadStorage`], so the catalog reads and writes
//! document bytes without knowing where they live.

use crate::StorageBackend;
use async_trait::async_trait;
use lectern_core::models::Document;
use lectern_core::AppError;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A disk-backed path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// A disk-backed path exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document record has no path although it is disk-backed.
    #[error("Disk-backed document {0} has no file path")]
    MissingPath(String),

    /// The document record is inline-backed but carries no bytes.
    #[error("Inline-backed document {0} has an empty payload")]
    MissingPayload(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_)
            | StorageError::Unreadable { .. }
            | StorageError::MissingPath(_) => AppError::StorageUnavailable(err.to_string()),
            StorageError::MissingPayload(_) => AppError::DataIntegrity(err.to_string()),
            StorageError::InvalidKey(_) => AppError::InvalidInput(err.to_string()),
            StorageError::WriteFailed(_)
            | StorageError::IoError(_)
            | StorageError::ConfigError(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// The persisted reference a backend produces for a new document row.
///
/// Exactly one of `file_data` / `file_path` is set, matching `backend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPayload {
    pub backend: StorageBackend,
    pub file_data: Option<Vec<u8>>,
    pub file_path: Option<String>,
}

/// Payload storage trait
///
/// Implemented by the inline and disk backends.
#[async_trait]
pub trait PayloadStorage: Send + Sync {
    /// Prepare the persisted reference for a new document.
    ///
    /// `existing_path` is a location the upload collaborator already wrote the
    /// bytes to. Backends that keep bytes elsewhere ignore it.
    async fn write(
        &self,
        stored_filename: &str,
        data: Vec<u8>,
        existing_path: Option<&Path>,
    ) -> StorageResult<StoredPayload>;

    /// Read the primary payload of a document stored by this backend.
    async fn read(&self, document: &Document) -> StorageResult<Vec<u8>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
