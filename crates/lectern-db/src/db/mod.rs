//! Document catalog repositories
//
// Store abstraction shared by every backend
pub mod document_store;
//
// In-memory store (tests, embedding)
pub mod memory;
//
// PostgreSQL store
pub mod postgres;

pub use document_store::DocumentStore;
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
