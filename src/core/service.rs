//! Service trait for entity fetching and mutations

use crate::core::entity::Entity;
use crate::core::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Entity fetcher and its sibling mutation calls
///
/// Implementations are the I/O boundary of a list screen. The screen is
/// agnostic to where records come from: a REST backend
/// ([`HttpEntityService`](crate::client::HttpEntityService)), a static array
/// ([`InMemoryEntityService`](crate::storage::InMemoryEntityService)) or a
/// cache in front of either ([`CachedEntityService`](crate::cache::CachedEntityService)).
///
/// Payloads are JSON objects using local field names.
#[async_trait]
pub trait EntityService<R: Entity>: Send + Sync {
    /// List all records
    async fn list(&self) -> Result<Vec<R>>;

    /// Get a record by ID
    async fn get(&self, id: &str) -> Result<Option<R>>;

    /// Create a record from a payload and return it as stored
    async fn create(&self, payload: Value) -> Result<R>;

    /// Update a record and return it as stored
    async fn update(&self, id: &str, payload: Value) -> Result<R>;

    /// Delete a record
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<R, S> EntityService<R> for std::sync::Arc<S>
where
    R: Entity,
    S: EntityService<R> + ?Sized,
{
    async fn list(&self) -> Result<Vec<R>> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        (**self).get(id).await
    }

    async fn create(&self, payload: Value) -> Result<R> {
        (**self).create(payload).await
    }

    async fn update(&self, id: &str, payload: Value) -> Result<R> {
        (**self).update(id, payload).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }
}
