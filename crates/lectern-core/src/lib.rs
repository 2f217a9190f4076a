//! Lectern Core Library
//!
//! Domain models, error types and configuration shared by every Lectern crate:
//! the document catalog, the payload storage backends and the container parser.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DocumentStorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
