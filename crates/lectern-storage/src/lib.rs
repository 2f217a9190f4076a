//! Lectern Storage Library
//!
//! Payload storage for documents. A document's primary bytes live in one of two
//! interchangeable backends:
//!
//! - **Inline**: the bytes travel with the document row (`file_data`).
//! - **Disk**: the row holds only a filesystem path (`file_path`).
//!
//! Both implement [`PayloadStorage`]. [`StorageBackends`] dispatches on a
//! document's backend flag and implements the one-directional Disk → Inline
//! migration and the non-mutating export.
//!
//! # Disk key format
//!
//! When the disk backend places a file itself it uses `documents/{stored_filename}`
//! under its root. Keys must not contain `..` or a leading `/`.

pub mod backends;
pub mod disk;
pub(crate) mod keys;
pub mod inline;
pub mod traits;

// Re-export commonly used types
pub use backends::{Migration, StorageBackends};
pub use disk::DiskStorage;
pub use inline::InlineStorage;
pub use lectern_core::StorageBackend;
pub use traits::{PayloadStorage, StorageError, StorageResult, StoredPayload};
