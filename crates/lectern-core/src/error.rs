//! Error types module
//!
//! All catalog, storage and configuration failures surface to callers as
//! `AppError`. Soft failures (an unreadable container, an unresolved
//! relationship descriptor, a failed post-commit media batch) are not errors
//! and never appear here.
//!
//! The `Database` variant wraps `sqlx::Error` when the `sqlx` feature is on.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like a missing document
    Debug,
    /// Recoverable issues like an unreachable disk path
    Warn,
    /// Unexpected failures
    Error,
}

/// Describes how an error should be presented by an outer request layer.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether retrying may succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// The requested document (or media asset) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record exists but its disk-backed bytes cannot be read.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The record claims inline storage but carries no payload.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::StorageUnavailable(_) => (503, "STORAGE_UNAVAILABLE", true, LogLevel::Warn),
        AppError::DataIntegrity(_) => (500, "DATA_INTEGRITY", false, LogLevel::Error),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", false, LogLevel::Error)
        }
    }
}

impl AppError {
    pub fn not_found_document(id: uuid::Uuid) -> Self {
        AppError::NotFound(format!("Document {} not found", id))
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::DataIntegrity(_) => "DataIntegrity",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge { .. } => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::StorageUnavailable(_) => "Document content is temporarily unavailable".to_string(),
            AppError::DataIntegrity(_) => "Stored document is inconsistent".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge { size, limit } => {
                format!("File too large: {} bytes exceeds limit of {} bytes", size, limit)
            }
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access database");
    }

    #[test]
    fn test_not_found_distinct_from_storage_unavailable() {
        let missing = AppError::not_found_document(uuid::Uuid::nil());
        let unreachable = AppError::StorageUnavailable("/srv/docs/a.docx".to_string());

        assert_eq!(missing.http_status_code(), 404);
        assert_eq!(unreachable.http_status_code(), 503);
        assert_ne!(missing.error_code(), unreachable.error_code());
        assert!(!missing.is_recoverable());
        assert!(unreachable.is_recoverable());
        assert_eq!(unreachable.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_data_integrity_hides_details() {
        let err = AppError::DataIntegrity("inline payload empty for 42".to_string());
        assert_eq!(err.error_code(), "DATA_INTEGRITY");
        assert!(!err.client_message().contains("42"));
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("while migrating"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("while migrating"));
    }

    #[test]
    fn test_payload_too_large_message() {
        let err = AppError::PayloadTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(err.http_status_code(), 413);
        assert!(err.client_message().contains("2048"));
    }
}
