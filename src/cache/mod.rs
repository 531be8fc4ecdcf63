//! Shared normalized query cache
//!
//! One [`QueryCache`] is shared (`Arc`) by every screen. Records are stored
//! once per entity type and id, so a mutation made through one screen is
//! visible to every other screen reading the same entity type.
//!
//! [`CachedEntityService`] wraps any [`EntityService`]:
//!
//! - `list` is answered from the cache while the entity's table is fresh
//! - concurrent `list` calls for the same entity share one upstream request
//! - `create` / `update` / `delete` write through to the cache
//! - `invalidate` forces the next `list` upstream

use crate::config::CacheConfig;
use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::service::EntityService;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default staleness window
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Records of one entity type, keyed by id in fetch order
struct EntityTable<R> {
    records: IndexMap<String, R>,
    fetched_at: Option<Instant>,
}

impl<R> Default for EntityTable<R> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            fetched_at: None,
        }
    }
}

/// Normalized cache shared between screens
pub struct QueryCache {
    tables: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    fetch_locks: RwLock<HashMap<TypeId, Arc<Mutex<()>>>>,
    stale_after: Duration,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_after", &self.stale_after)
            .finish_non_exhaustive()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            fetch_locks: RwLock::new(HashMap::new()),
            stale_after,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.stale_after())
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    fn read<R: Entity, T>(&self, f: impl FnOnce(Option<&EntityTable<R>>) -> T) -> T {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .get(&TypeId::of::<R>())
            .and_then(|t| t.downcast_ref::<EntityTable<R>>());
        f(table)
    }

    fn write<R: Entity, T>(&self, f: impl FnOnce(&mut EntityTable<R>) -> T) -> T {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let entry = tables
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Box::new(EntityTable::<R>::default()));
        if !entry.is::<EntityTable<R>>() {
            *entry = Box::new(EntityTable::<R>::default());
        }
        match entry.downcast_mut::<EntityTable<R>>() {
            Some(table) => f(table),
            None => f(&mut EntityTable::default()),
        }
    }

    /// Whether the entity's list was fetched within the staleness window
    pub fn is_fresh<R: Entity>(&self) -> bool {
        self.read::<R, _>(|table| {
            table
                .and_then(|t| t.fetched_at)
                .is_some_and(|at| at.elapsed() < self.stale_after)
        })
    }

    /// Cached list if it is still fresh
    pub fn fresh_list<R: Entity>(&self) -> Option<Vec<R>> {
        self.read::<R, _>(|table| {
            let table = table?;
            let fresh = table
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.stale_after);
            fresh.then(|| table.records.values().cloned().collect())
        })
    }

    /// Everything cached for an entity, fresh or not
    pub fn records<R: Entity>(&self) -> Vec<R> {
        self.read::<R, _>(|table| {
            table
                .map(|t| t.records.values().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Replace the entity's table with a freshly fetched list
    pub fn store_list<R: Entity>(&self, records: Vec<R>) {
        self.write::<R, _>(|table| {
            table.records = records
                .into_iter()
                .map(|r| (r.id().to_string(), r))
                .collect();
            table.fetched_at = Some(Instant::now());
        });
    }

    pub fn get<R: Entity>(&self, id: &str) -> Option<R> {
        self.read::<R, _>(|table| table.and_then(|t| t.records.get(id).cloned()))
    }

    /// Insert or replace one record, keeping its position
    pub fn upsert<R: Entity>(&self, record: R) {
        self.write::<R, _>(|table| {
            table.records.insert(record.id().to_string(), record);
        });
    }

    pub fn remove<R: Entity>(&self, id: &str) -> Option<R> {
        self.write::<R, _>(|table| table.records.shift_remove(id))
    }

    /// Mark the entity stale; records stay readable until the next fetch
    pub fn invalidate<R: Entity>(&self) {
        self.write::<R, _>(|table| table.fetched_at = None);
    }

    /// Drop every table
    pub fn clear(&self) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Lock serializing upstream list fetches and write-through of one entity type
    fn fetch_lock<R: Entity>(&self) -> Arc<Mutex<()>> {
        let key = TypeId::of::<R>();
        if let Some(lock) = self
            .fetch_locks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return lock.clone();
        }
        self.fetch_locks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }
}

/// [`EntityService`] answering from a shared [`QueryCache`]
pub struct CachedEntityService<R, S> {
    inner: S,
    cache: Arc<QueryCache>,
    _marker: PhantomData<fn() -> R>,
}

impl<R, S> CachedEntityService<R, S>
where
    R: Entity,
    S: EntityService<R>,
{
    pub fn new(inner: S, cache: Arc<QueryCache>) -> Self {
        Self {
            inner,
            cache,
            _marker: PhantomData,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Force the next `list` to go upstream
    pub fn invalidate(&self) {
        tracing::debug!(entity = R::resource_name(), "cache invalidated");
        self.cache.invalidate::<R>();
    }
}

#[async_trait]
impl<R, S> EntityService<R> for CachedEntityService<R, S>
where
    R: Entity,
    S: EntityService<R>,
{
    async fn list(&self) -> Result<Vec<R>> {
        if let Some(records) = self.cache.fresh_list::<R>() {
            tracing::debug!(entity = R::resource_name(), "cache hit");
            return Ok(records);
        }

        let lock = self.cache.fetch_lock::<R>();
        let _guard = lock.lock().await;

        // Another caller may have fetched while we waited
        if let Some(records) = self.cache.fresh_list::<R>() {
            tracing::debug!(entity = R::resource_name(), "cache hit after wait");
            return Ok(records);
        }

        tracing::debug!(entity = R::resource_name(), "cache miss, fetching");
        let records = self.inner.list().await?;
        self.cache.store_list(records.clone());
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        if self.cache.is_fresh::<R>() {
            if let Some(record) = self.cache.get::<R>(id) {
                return Ok(Some(record));
            }
        }
        let record = self.inner.get(id).await?;
        if let Some(record) = &record {
            self.cache.upsert(record.clone());
        }
        Ok(record)
    }

    // Write-through waits for an in-flight fetch so its snapshot cannot
    // overwrite the mutation.

    async fn create(&self, payload: Value) -> Result<R> {
        let record = self.inner.create(payload).await?;
        let lock = self.cache.fetch_lock::<R>();
        let _guard = lock.lock().await;
        self.cache.upsert(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, payload: Value) -> Result<R> {
        let record = self.inner.update(id, payload).await?;
        let lock = self.cache.fetch_lock::<R>();
        let _guard = lock.lock().await;
        if record.id() != id {
            self.cache.remove::<R>(id);
        }
        self.cache.upsert(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await?;
        let lock = self.cache.fetch_lock::<R>();
        let _guard = lock.lock().await;
        self.cache.remove::<R>(id);
        Ok(())
    }
}
