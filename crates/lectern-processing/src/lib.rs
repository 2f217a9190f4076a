//! Lectern Processing Library
//!
//! Container handling for uploaded office documents: format detection from
//! magic bytes and extraction of embedded media from ZIP-based packages.

#[cfg(feature = "document")]
pub mod container;
pub mod format;

#[cfg(feature = "document")]
pub use container::{
    extract_media, ContainerParser, DegradedReason, ExtractionOutcome, MediaCandidate,
    RegexRelationshipResolver, RelationshipError, RelationshipResolver,
};
pub use format::DocumentFormat;
