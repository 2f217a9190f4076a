//! Lectern catalog persistence
//!
//! The [`DocumentStore`] trait is the only way the rest of Lectern touches the
//! datastore. [`PostgresDocumentStore`] backs production; the in-memory store
//! backs tests and embedded use.

pub mod db;
pub mod setup;

pub use db::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
pub use setup::setup_database;
