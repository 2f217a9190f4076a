//! Document & media catalog
//!
//! Ingestion, retrieval, listing, deletion and backend migration of documents.

pub use request::{generate_stored_filename, FullDocument, IngestRequest};
pub use service::{BulkMigrationReport, DocumentCatalog};

mod request;
mod service;
