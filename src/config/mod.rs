//! Configuration loading and management
//!
//! ```yaml
//! api:
//!   base_url: https://shop.example.com/api
//!   timeout_secs: 15
//!   token_file: /var/lib/storedesk/session.json
//! cache:
//!   stale_after_secs: 300
//! endpoints:
//!   employees:
//!     path: /staff
//!     envelope: results
//!     fields:
//!       full_name: name
//!   warehouse:
//!     path: /warehouse
//!     source: static
//! screens:
//!   orders:
//!     entity: orders
//!     search_fields: [id, customer]
//!     tabs:
//!       field: status
//!       tabs:
//!         - { key: all, label: All }
//!         - { key: new, label: New, value: yangi }
//! ```

use crate::client::{ApiClient, FieldMapping, HttpEntityService};
use crate::core::auth::{DEFAULT_TOKEN_KEY, FileTokenStore, Session};
use crate::core::entity::Entity;
use crate::core::error::{ConfigError, Result};
use crate::core::notice::NoticeDurations;
use crate::core::pipeline::ListDescriptor;
use crate::core::service::EntityService;
use crate::entities::{Category, Employee, Order, Product, WarehouseItem};
use crate::storage::InMemoryEntityService;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_stale_after_secs() -> u64 {
    300
}

/// Backend connection and session storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Key holding the token inside the token file
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Persist the token here; in-memory when absent
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token_key: default_token_key(),
            token_file: None,
        }
    }
}

impl ApiConfig {
    /// Session over the configured token storage
    pub fn session(&self) -> Session {
        match &self.token_file {
            Some(path) => Session::new(Arc::new(FileTokenStore::new(path, &self.token_key))),
            None => Session::in_memory(),
        }
    }
}

/// Shared query cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

impl CacheConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

/// Where a screen's records come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Remote,
    /// Local fixture data, no requests
    Static,
}

/// One REST resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Path under the base URL (e.g., "/orders")
    pub path: String,

    /// Key wrapping list responses; probes `data`/`results`/`items` when absent
    #[serde(default)]
    pub envelope: Option<String>,

    /// Backend field name -> local field name
    #[serde(default)]
    pub fields: FieldMapping,

    #[serde(default)]
    pub source: DataSource,
}

impl EndpointConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            envelope: None,
            fields: FieldMapping::new(),
            source: DataSource::Remote,
        }
    }

    pub fn envelope(mut self, key: impl Into<String>) -> Self {
        self.envelope = Some(key.into());
        self
    }

    pub fn field(mut self, backend: impl Into<String>, local: impl Into<String>) -> Self {
        self.fields = self.fields.rename(backend, local);
        self
    }

    pub fn static_source(mut self) -> Self {
        self.source = DataSource::Static;
        self
    }
}

/// Complete configuration of the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub notices: NoticeDurations,

    /// Entity resource name -> endpoint
    #[serde(default)]
    pub endpoints: IndexMap<String, EndpointConfig>,

    /// Entity resource name -> screen descriptor
    #[serde(default)]
    pub screens: IndexMap<String, ListDescriptor>,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Endpoint of an entity, falling back to `/<resource name>`
    pub fn endpoint<R: Entity>(&self) -> EndpointConfig {
        self.endpoints
            .get(R::resource_name())
            .cloned()
            .unwrap_or_else(|| EndpointConfig::new(format!("/{}", R::resource_name())))
    }

    /// Data source of an entity's screen, as its endpoint declares
    ///
    /// `remote` screens talk to the backend through `client`; `static`
    /// screens serve `fixtures` (a JSON array) and never send a request.
    pub fn service<R>(
        &self,
        client: &ApiClient,
        fixtures: Value,
    ) -> Result<Arc<dyn EntityService<R>>>
    where
        R: Entity + Serialize + DeserializeOwned,
    {
        let endpoint = self.endpoint::<R>();
        match endpoint.source {
            DataSource::Remote => {
                tracing::debug!(entity = R::resource_name(), path = %endpoint.path, "remote data source");
                Ok(Arc::new(HttpEntityService::<R>::new(client.clone(), endpoint)))
            }
            DataSource::Static => {
                let service = InMemoryEntityService::<R>::from_json(fixtures)?;
                tracing::debug!(entity = R::resource_name(), count = service.len(), "static data source");
                Ok(Arc::new(service))
            }
        }
    }

    /// Configured descriptor of a screen, if any
    pub fn screen(&self, entity: &str) -> Option<&ListDescriptor> {
        self.screens.get(entity)
    }

    /// Reject descriptors and endpoints that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", "0", "timeout must be positive"));
        }

        for (entity, endpoint) in &self.endpoints {
            if !endpoint.path.starts_with('/') {
                return Err(invalid(
                    &format!("endpoints.{}.path", entity),
                    &endpoint.path,
                    "path must start with '/'",
                ));
            }
        }

        for (entity, screen) in &self.screens {
            if screen.page_size == 0 {
                return Err(invalid(
                    &format!("screens.{}.page_size", entity),
                    "0",
                    "page size must be at least 1",
                ));
            }
            if let Some(tabs) = &screen.tabs {
                if tabs.tabs.is_empty() {
                    return Err(invalid(
                        &format!("screens.{}.tabs", entity),
                        &tabs.field,
                        "tab set must contain at least one tab",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Create a default configuration with every built-in screen
    pub fn default_config() -> Self {
        let endpoints = IndexMap::from([
            ("orders".to_string(), EndpointConfig::new("/orders")),
            ("employees".to_string(), EndpointConfig::new("/employees")),
            ("products".to_string(), EndpointConfig::new("/products")),
            ("categories".to_string(), EndpointConfig::new("/categories")),
            (
                "warehouse".to_string(),
                EndpointConfig::new("/warehouse").static_source(),
            ),
        ]);

        let screens = [
            Order::descriptor(),
            Employee::descriptor(),
            Product::descriptor(),
            Category::descriptor(),
            WarehouseItem::descriptor(),
        ]
        .into_iter()
        .map(|d| (d.entity.clone(), d))
        .collect();

        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            notices: NoticeDurations::default(),
            endpoints,
            screens,
        }
    }
}

fn invalid(field: &str, value: &str, message: &str) -> crate::core::error::DashboardError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
    .into()
}
