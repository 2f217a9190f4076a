//! Document format detection from magic bytes

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    /// ZIP-based package (DOCX, PPTX, XLSX, ODF).
    ZipPackage,
    /// Compound-file binary (DOC, PPT, XLS).
    LegacyOffice,
    Unknown,
}

impl DocumentFormat {
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF") {
            DocumentFormat::Pdf
        } else if data.starts_with(b"PK\x03\x04") || data.starts_with(b"PK\x05\x06") {
            // PK\x05\x06 is the end-of-central-directory record of an empty archive
            DocumentFormat::ZipPackage
        } else if data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
            DocumentFormat::LegacyOffice
        } else {
            DocumentFormat::Unknown
        }
    }

    /// Only ZIP packages can carry extractable media.
    pub fn is_container(&self) -> bool {
        matches!(self, DocumentFormat::ZipPackage)
    }
}

impl Display for DocumentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::ZipPackage => write!(f, "zip_package"),
            DocumentFormat::LegacyOffice => write!(f, "legacy_office"),
            DocumentFormat::Unknown => write!(f, "unknown"),
        }
    }
}
