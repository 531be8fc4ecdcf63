//! # storedesk
//!
//! A headless engine for the list screens of a storefront admin dashboard.
//!
//! ## Features
//!
//! - **One List Pipeline**: filter -> sort -> paginate for every screen, driven by a declarative descriptor
//! - **Tab Counts**: per-status counts over the full data, independent of search and filters
//! - **REST Entity Fetcher**: bearer-token auth, declarative field remapping, error-body extraction
//! - **Shared Query Cache**: normalized by entity and id, request de-duplication, staleness window
//! - **Form Validation**: derive-based rules plus phone, password and image checks
//! - **Export**: CSV with BOM, `.xlsx` workbook and printable HTML of the filtered set
//! - **Configuration-Based**: endpoints and screens described in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storedesk::prelude::*;
//!
//! let config = DashboardConfig::from_yaml_file("dashboard.yaml")?;
//! let session = config.api.session();
//! let client = ApiClient::from_config(&config.api, session)?;
//! let cache = Arc::new(QueryCache::from_config(&config.cache));
//!
//! // Remote or static, as `endpoints.orders.source` says
//! let orders = CachedEntityService::new(
//!     config.service::<Order>(&client, serde_json::json!([]))?,
//!     cache.clone(),
//! );
//!
//! let mut screen = ListScreen::new(Order::descriptor(), orders)
//!     .with_exporter(Order::export_columns());
//! screen.load().await?;
//! screen.set_tab("new");
//! screen.toggle_sort("price");
//!
//! let view = screen.view();
//! println!("{} of {} orders", view.rows().len(), view.total());
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod export;
pub mod screen;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{FileTokenStore, Gate, MemoryTokenStore, Session, TokenStore},
        comparator::{Comparator, SortDirection, SortKind, SortSpec},
        entity::Entity,
        error::{
            AuthError, ConfigError, DashboardError, ExportError, FetchError, Result,
            ValidationError,
        },
        field::{FieldValue, ToFieldValue},
        notice::{LoadState, Notice, NoticeDurations, NoticeLevel},
        pipeline::{FilterKind, ListDescriptor, ListPipeline, ListView, Tab},
        predicate::Predicate,
        query::{ALL, ListQuery, MAX_PAGE_SIZE, PaginationMeta},
        service::EntityService,
        validation::{FormMode, FormModel, ImageUpload, prepare},
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Entities ===
    pub use crate::entities::{
        Category, CategoryForm, Employee, EmployeeForm, EmployeeRole, Order, OrderStatus,
        Product, ProductForm, RecordId, WarehouseItem,
    };

    // === Services ===
    pub use crate::cache::{CachedEntityService, QueryCache};
    pub use crate::client::{ApiClient, FieldMapping, HttpEntityService};
    pub use crate::storage::InMemoryEntityService;

    // === Export ===
    pub use crate::export::{ExportColumns, ExportFile, ExportFormat, Exporter};

    // === Screen ===
    pub use crate::screen::ListScreen;

    // === Config ===
    pub use crate::config::{ApiConfig, CacheConfig, DashboardConfig, DataSource, EndpointConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
