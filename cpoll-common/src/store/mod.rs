//! Response storage
//!
//! One trait, two backends selected by configuration:
//! - [`FileStore`]: append-only line-delimited JSON (development)
//! - [`SqlStore`]: `responses` table (production)
//!
//! Callers only see [`ResponseRecord`]s and never branch on the backend.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::models::{NewResponse, ResponseRecord};
use crate::Result;

mod file;
#[cfg(feature = "sqlx")]
mod sql;

pub use file::FileStore;
#[cfg(feature = "sqlx")]
pub use sql::SqlStore;

/// Append and list survey responses
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Persist one response; the backend assigns timestamp (and id, where
    /// supported). Returns the record as stored.
    async fn append(&self, response: &NewResponse) -> Result<ResponseRecord>;

    /// Every stored record, unfiltered
    ///
    /// Ordering is backend-specific: newest-first for SQL, append order for
    /// the file backend.
    async fn list_all(&self) -> Result<Vec<ResponseRecord>>;
}

/// Open the backend named by `config`
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ResponseStore>> {
    match config.backend {
        StorageBackend::File => {
            info!(
                "Response store: file backend at {}",
                config.file_path.display()
            );
            Ok(Arc::new(FileStore::new(&config.file_path)))
        }
        #[cfg(feature = "sqlx")]
        StorageBackend::Sql => {
            info!(
                "Response store: SQL backend at {}",
                config.database_path.display()
            );
            Ok(Arc::new(SqlStore::open(&config.database_path).await?))
        }
        #[cfg(not(feature = "sqlx"))]
        StorageBackend::Sql => Err(crate::Error::Config(
            "SQL storage backend requires the 'sqlx' feature".to_string(),
        )),
    }
}
