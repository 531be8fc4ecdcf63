//! In-memory implementation of EntityService for static screens and tests

use crate::core::entity::Entity;
use crate::core::error::{FetchError, Result, StorageError};
use crate::core::service::EntityService;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory entity service
///
/// Backs screens that still run on fixture arrays. Records keep their
/// insertion order; `create` assigns a UUID when the payload has no id and
/// `update` merges the payload into the stored record.
pub struct InMemoryEntityService<R> {
    records: Arc<RwLock<IndexMap<String, R>>>,
}

impl<R> Clone for InMemoryEntityService<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: Entity> InMemoryEntityService<R> {
    /// Create an empty in-memory service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Entity + DeserializeOwned> InMemoryEntityService<R> {
    /// Load fixtures from a JSON array
    pub fn from_json(fixtures: Value) -> Result<Self> {
        let records: Vec<R> = serde_json::from_value(fixtures).map_err(|e| FetchError::Decode {
            entity_type: R::resource_name().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_records(records))
    }
}

impl<R: Entity> Default for InMemoryEntityService<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<R: Entity + DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| {
        FetchError::Decode {
            entity_type: R::resource_name().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn not_found<R: Entity>(id: &str) -> FetchError {
    FetchError::NotFound {
        entity_type: R::resource_name_singular().to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl<R> EntityService<R> for InMemoryEntityService<R>
where
    R: Entity + Serialize + DeserializeOwned,
{
    async fn list(&self) -> Result<Vec<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(records.get(id).cloned())
    }

    async fn create(&self, payload: Value) -> Result<R> {
        let mut payload = match payload {
            Value::Object(object) => object,
            other => {
                return Err(FetchError::Decode {
                    entity_type: R::resource_name().to_string(),
                    message: format!("expected an object, got {}", other),
                }
                .into());
            }
        };
        if !payload.contains_key("id") {
            payload.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        let record: R = decode(Value::Object(payload))?;

        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        records.insert(record.id().to_string(), record.clone());

        Ok(record)
    }

    async fn update(&self, id: &str, payload: Value) -> Result<R> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let existing = records.get(id).ok_or_else(|| not_found::<R>(id))?;

        let mut merged = serde_json::to_value(existing)?;
        if let (Value::Object(target), Value::Object(changes)) = (&mut merged, payload) {
            for (key, value) in changes {
                if key != "id" {
                    target.insert(key, value);
                }
            }
        }
        let updated: R = decode(merged)?;

        records.insert(id.to_string(), updated.clone());

        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        records.shift_remove(id).ok_or_else(|| not_found::<R>(id))?;

        Ok(())
    }
}
