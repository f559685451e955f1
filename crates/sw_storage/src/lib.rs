use std::sync::Arc;

use async_trait::async_trait;
use sw_core::{ArticleStorage, Error, Result};

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Sized + Send + Sync {
    fn get_error_message() -> &'static str;
    async fn connect(url: &str) -> Result<Self>;
}

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

/// Pick a backend from a database URL: `memory` or `memory://` for the
/// in-process store, `sqlite:<path>` for a SQLite file, `postgres://` or
/// `postgresql://` for a PostgreSQL server.
pub async fn create_storage(url: &str) -> Result<Arc<dyn ArticleStorage>> {
    if url == "memory" || url.starts_with("memory://") {
        return Ok(Arc::new(InMemoryStorage::connect(url).await?));
    }

    #[cfg(feature = "postgres")]
    if is_postgres_url(url) {
        let storage = PostgresStorage::connect(url).await.map_err(|e| {
            tracing::error!("{}", PostgresStorage::get_error_message());
            e
        })?;
        return Ok(Arc::new(storage));
    }

    #[cfg(not(feature = "postgres"))]
    if is_postgres_url(url) {
        return Err(Error::Storage(
            "PostgreSQL support is not enabled, rebuild with the `postgres` feature".to_string(),
        ));
    }

    #[cfg(feature = "sqlite")]
    if url.starts_with("sqlite:") {
        let storage = SQLiteStorage::connect(url).await.map_err(|e| {
            tracing::error!(url, "{}", SQLiteStorage::get_error_message());
            e
        })?;
        return Ok(Arc::new(storage));
    }

    Err(Error::Storage(format!("Unsupported database URL: {}", url)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}
