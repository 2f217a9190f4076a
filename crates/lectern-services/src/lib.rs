//! Lectern Services Layer
//!
//! Orchestration over the catalog store, the payload backends and the
//! container parser. Callers (the CLI, a future HTTP layer, the parsing
//! pipeline) depend on this crate only.

pub mod catalog;
pub mod stats;

pub use catalog::{
    generate_stored_filename, BulkMigrationReport, DocumentCatalog, FullDocument, IngestRequest,
};
pub use stats::StorageStatsAggregator;

pub use lectern_db::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
pub use lectern_processing::{ContainerParser, ExtractionOutcome, MediaCandidate};
pub use lectern_storage::StorageBackends;
