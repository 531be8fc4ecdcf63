//! Entity fetcher: REST client with bearer auth and field remapping

pub mod http;
pub mod mapping;

pub use http::{ApiClient, HttpEntityService};
pub use mapping::FieldMapping;
