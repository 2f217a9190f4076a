use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Where a document's primary payload lives.
///
/// `Inline` keeps the bytes in the document row itself; `Disk` keeps only a
/// filesystem path in the row. Defined in core because configuration, the
/// database layer and the storage backends all need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "storage_backend", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Disk,
    #[default]
    Inline,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disk" => Ok(StorageBackend::Disk),
            "inline" => Ok(StorageBackend::Inline),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Disk => write!(f, "disk"),
            StorageBackend::Inline => write!(f, "inline"),
        }
    }
}
