//! Orders screen: record, status enum and list descriptor

use crate::core::comparator::{SortKind, SortSpec};
use crate::core::field::{FieldValue, ToFieldValue};
use crate::core::pipeline::{ListDescriptor, Tab};
use crate::export::ExportColumns;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an order
///
/// Serialized as the backend label. This enum is the only place the labels,
/// the dropdown options and the badge styles are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "yangi", alias = "new")]
    New,
    #[serde(rename = "jarayonda", alias = "processing")]
    Processing,
    #[serde(rename = "yuborilgan", alias = "shipped")]
    Shipped,
    #[serde(rename = "yetkazilgan", alias = "delivered")]
    Delivered,
    #[serde(rename = "bekor qilingan", alias = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Value stored by the backend
    pub fn backend_label(self) -> &'static str {
        match self {
            OrderStatus::New => "yangi",
            OrderStatus::Processing => "jarayonda",
            OrderStatus::Shipped => "yuborilgan",
            OrderStatus::Delivered => "yetkazilgan",
            OrderStatus::Cancelled => "bekor qilingan",
        }
    }

    /// Tab key
    pub fn key(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge style class
    pub fn badge(self) -> &'static str {
        match self {
            OrderStatus::New => "badge-info",
            OrderStatus::Processing => "badge-warning",
            OrderStatus::Shipped => "badge-primary",
            OrderStatus::Delivered => "badge-success",
            OrderStatus::Cancelled => "badge-danger",
        }
    }

    /// Look a status up by backend label, key or English name
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|s| {
            s.backend_label().eq_ignore_ascii_case(raw) || s.key().eq_ignore_ascii_case(raw)
        })
    }

    /// The "all" tab followed by one tab per status
    pub fn tabs() -> Vec<Tab> {
        std::iter::once(Tab::all("all", "All"))
            .chain(
                Self::ALL
                    .into_iter()
                    .map(|s| Tab::new(s.key(), s.label(), s.backend_label())),
            )
            .collect()
    }

    /// Dropdown options (backend labels)
    pub fn options() -> Vec<&'static str> {
        Self::ALL.into_iter().map(Self::backend_label).collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_label())
    }
}

impl ToFieldValue for OrderStatus {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.backend_label().to_string())
    }
}

crate::impl_entity!(Order, "orders", "order", {
    customer: String,
    #[serde(deserialize_with = "crate::entities::de::number")]
    price: f64,
    #[serde(default)]
    payment_method: String,
    #[serde(default)]
    product: String,
    #[serde(default)]
    delivery_method: String,
    status: OrderStatus,
    #[serde(default)]
    platform: String,
    /// Backend timestamp, kept verbatim (`2024-03-01T10:15:00Z` or `2024-03-01`)
    #[serde(default)]
    created_at: String,
});

impl Order {
    /// Descriptor of the orders screen
    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new("orders")
            .search(["id", "customer", "product", "status"])
            .select_with_options("status", OrderStatus::options())
            .select("platform")
            .select("payment_method")
            .select("delivery_method")
            .date_range("created_at")
            .sort("customer", SortKind::Text)
            .sort("price", SortKind::Numeric)
            .sort("created_at", SortKind::Date)
            .tabs("status", OrderStatus::tabs())
            .default_sort(SortSpec::desc("created_at"))
    }

    /// Columns of the orders export, in order
    pub fn export_columns() -> ExportColumns {
        ExportColumns::new()
            .column("id", "ID")
            .column("customer", "Customer")
            .column("product", "Product")
            .column("price", "Price")
            .column("payment_method", "Payment")
            .column("delivery_method", "Delivery")
            .column("status", "Status")
            .column("platform", "Platform")
            .column("created_at", "Created")
    }
}
