//! Embedded media extraction from ZIP-based office packages

pub mod layout;
pub mod mime;
pub mod parser;
pub mod relationships;

pub use parser::{extract_media, ContainerParser, DegradedReason, ExtractionOutcome, MediaCandidate};
pub use relationships::{RegexRelationshipResolver, RelationshipError, RelationshipResolver};
