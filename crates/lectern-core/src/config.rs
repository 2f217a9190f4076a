//! Configuration module
//!
//! Database and document-storage settings, read from the environment.
//! Binaries load a `.env` file with `dotenvy` before calling [`Config::from_env`].

use std::env;
use std::path::{Path, PathBuf};

use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_DOCUMENT_SIZE_MB: usize = 25;
const DEFAULT_STORAGE_PATH: &str = "./uploads";

/// Settings shared by every binary that talks to the catalog database.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Document storage settings.
#[derive(Clone, Debug)]
pub struct DocumentStorageConfig {
    /// Root under which the disk backend places files it writes itself.
    pub storage_path: PathBuf,
    /// Backend used when an ingestion request does not name one.
    pub default_backend: StorageBackend,
    /// Upload ceiling checked before container parsing.
    pub max_document_size_bytes: usize,
}

impl Default for DocumentStorageConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            default_backend: StorageBackend::Inline,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * 1024 * 1024,
        }
    }
}

impl DocumentStorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let default_backend = match env::var("DEFAULT_STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Inline,
        };

        let max_document_size_mb = env::var("MAX_DOCUMENT_SIZE_MB")
            .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be a valid number"))?;

        Ok(Self {
            storage_path: env::var("DOCUMENT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            default_backend,
            max_document_size_bytes: max_document_size_mb * 1024 * 1024,
        })
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    base: BaseConfig,
    storage: DocumentStorageConfig,
}

impl Config {
    pub fn new(base: BaseConfig, storage: DocumentStorageConfig) -> Self {
        Self { base, storage }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let base = BaseConfig {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
        };

        let config = Config::new(base, DocumentStorageConfig::from_env()?);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
        }
        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }
        if self.storage.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be greater than 0"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn storage(&self) -> &DocumentStorageConfig {
        &self.storage
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage.storage_path
    }

    pub fn default_backend(&self) -> StorageBackend {
        self.storage.default_backend
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.storage.max_document_size_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseConfig {
        BaseConfig {
            database_url: "postgres://localhost/lectern".to_string(),
            db_max_connections: 5,
            db_timeout_seconds: 10,
            environment: "prod".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config::new(base(), DocumentStorageConfig::default());
        assert!(config.validate().is_ok());
        assert!(config.is_production());
        assert_eq!(config.default_backend(), StorageBackend::Inline);
        assert_eq!(config.max_document_size_bytes(), 25 * 1024 * 1024);
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let storage = DocumentStorageConfig {
            max_document_size_bytes: 0,
            ..DocumentStorageConfig::default()
        };
        assert!(Config::new(base(), storage).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut b = base();
        b.db_max_connections = 0;
        assert!(Config::new(b, DocumentStorageConfig::default())
            .validate()
            .is_err());
    }
}
