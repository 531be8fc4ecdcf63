//! Warehouse screen
//!
//! Stock levels per product and department. This screen usually runs on a
//! static source until the backend exposes the endpoint.

use crate::core::comparator::{SortKind, SortSpec};
use crate::core::pipeline::{ListDescriptor, Tab};
use crate::export::ExportColumns;

/// Stock below this is shown as low
pub const LOW_STOCK_THRESHOLD: i64 = 5;

crate::impl_entity!(WarehouseItem, "warehouse", "warehouse item", {
    name: String,
    #[serde(default)]
    department: String,
    #[serde(default, deserialize_with = "crate::entities::de::number")]
    price: f64,
    #[serde(default, deserialize_with = "crate::entities::de::count")]
    stock: i64,
    #[serde(default = "crate::entities::product::default_active")]
    active: bool,
    #[serde(default)]
    image_url: Option<String>,
    /// `YYYY-MM-DD` of the last delivery
    #[serde(default)]
    received_at: String,
});

impl WarehouseItem {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new("warehouse")
            .search(["name", "department"])
            .select("department")
            .date_range("received_at")
            .sort("name", SortKind::Text)
            .sort("stock", SortKind::Numeric)
            .sort("price", SortKind::Numeric)
            .sort("received_at", SortKind::Date)
            .tabs(
                "active",
                vec![
                    Tab::all("all", "All"),
                    Tab::new("active", "In use", "true"),
                    Tab::new("inactive", "Archived", "false"),
                ],
            )
            .default_sort(SortSpec::asc("name"))
            .page_size(20)
    }

    pub fn export_columns() -> ExportColumns {
        ExportColumns::new()
            .column("id", "ID")
            .column("name", "Name")
            .column("department", "Department")
            .column("stock", "Stock")
            .column("price", "Price")
            .column("received_at", "Received")
    }
}
