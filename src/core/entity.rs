//! Entity trait defining what a list screen needs to know about a record

use crate::core::field::FieldValue;

/// Base trait for all records shown in list screens.
///
/// Records are flat and externally sourced: the dashboard does not own their
/// lifecycle beyond its local copy. The list pipeline, the export adapter and
/// the query cache only talk to records through this trait.
///
/// Use [`impl_entity!`](crate::impl_entity) instead of implementing it by hand.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and cache keys (e.g., "orders")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "order")
    fn resource_name_singular() -> &'static str;

    /// Names of the fields exposed through [`Entity::field_value`]
    fn fields() -> &'static [&'static str];

    /// Get the identifier of this record
    fn id(&self) -> &str;

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Text of a field, empty when the field is unknown or null
    fn field_text(&self, field: &str) -> String {
        self.field_value(field)
            .map(|v| v.to_text())
            .unwrap_or_default()
    }
}
