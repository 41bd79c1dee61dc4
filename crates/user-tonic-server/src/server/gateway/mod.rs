//! Persistence gateways for user records.
//!
//! The service layer only talks to [`UserGateway`]; which backend sits behind
//! it is decided once at startup by [`connect`].
//!
//! ## Structure
//!
//! - [`memory`] - Process-local store. Default backend and the one tests use.
//! - `postgres` - PostgreSQL via `sqlx`, behind the `postgres` feature.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use crate::server::config::StorageConfig;
use std::sync::Arc;
use user_tonic_core::types::{Page, PageRequest, User, UserId};

/// Durable store for [`User`] records.
///
/// Implementations own id assignment and the `created_at` / `updated_at`
/// timestamps. They must be safe to call concurrently; callers add no
/// coordination of their own.
#[tonic::async_trait]
pub trait UserGateway: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;

    /// Inserts `user` when its id is unset, otherwise overwrites the stored
    /// record. Returns the record as stored.
    async fn save(&self, user: User) -> anyhow::Result<User>;

    async fn exists_by_id(&self, id: UserId) -> anyhow::Result<bool>;

    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()>;

    /// Returns one page ordered by id, plus the total number of records.
    async fn find_all(&self, page: PageRequest) -> anyhow::Result<Page<User>>;

    /// Releases held resources. Called once during shutdown.
    async fn close(&self) {}
}

/// Builds the gateway selected by `storage`.
pub async fn connect(storage: &StorageConfig) -> anyhow::Result<Arc<dyn UserGateway>> {
    match storage {
        StorageConfig::Memory => Ok(Arc::new(memory::InMemoryUserGateway::new())),
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let gateway =
                postgres::PostgresUserGateway::connect(database_url, *max_connections).await?;
            Ok(Arc::new(gateway))
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => {
            anyhow::bail!("PostgreSQL storage requires the `postgres` feature")
        }
    }
}
