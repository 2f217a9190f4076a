//! Data models for the document catalog
//!
//! Documents, the media assets extracted from them, listing/pagination types
//! and storage statistics.

mod document;
mod listing;
mod media_asset;
mod stats;

pub use document::*;
pub use listing::*;
pub use media_asset::*;
pub use stats::*;
