//! Core module containing the list pipeline and the traits around it

pub mod auth;
pub mod comparator;
pub mod entity;
pub mod error;
pub mod field;
pub mod notice;
pub mod pipeline;
pub mod predicate;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{FileTokenStore, Gate, MemoryTokenStore, Session, TokenStore};
pub use comparator::{Comparator, SortDirection, SortKind, SortSpec};
pub use entity::Entity;
pub use error::{DashboardError, Result};
pub use field::{FieldValue, ToFieldValue, is_valid_phone};
pub use notice::{LoadState, Notice, NoticeDurations, NoticeLevel};
pub use pipeline::{ListDescriptor, ListPipeline, ListView, Tab};
pub use predicate::Predicate;
pub use query::{ALL, ListQuery, PaginationMeta};
pub use service::EntityService;
