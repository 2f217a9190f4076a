//! Filter and pagination types for catalog listing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{DocumentMetadata, DocumentStatus};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional equality filters; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub subject_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub status: Option<DocumentStatus>,
    pub uploaded_by: Option<Uuid>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &DocumentMetadata) -> bool {
        self.subject_id.map_or(true, |id| doc.subject_id == Some(id))
            && self.class_id.map_or(true, |id| doc.class_id == Some(id))
            && self.status.map_or(true, |s| doc.status == s)
            && self.uploaded_by.map_or(true, |id| doc.uploaded_by == id)
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Page is at least 1; page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}

/// One page of documents plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    pub items: Vec<DocumentMetadata>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}
