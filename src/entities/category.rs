//! Categories screen

use crate::core::comparator::{SortKind, SortSpec};
use crate::core::pipeline::{ListDescriptor, Tab};
use crate::core::validation::{FormModel, filters};
use crate::export::ExportColumns;
use serde_json::{Value, json};
use validator::Validate;

crate::impl_entity!(Category, "categories", "category", {
    name: String,
    #[serde(default = "crate::entities::product::default_active")]
    active: bool,
    #[serde(default, deserialize_with = "crate::entities::de::count")]
    product_count: i64,
});

impl Category {
    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new("categories")
            .search(["name"])
            .sort("name", SortKind::Text)
            .sort("product_count", SortKind::Numeric)
            .tabs(
                "active",
                vec![
                    Tab::all("all", "All"),
                    Tab::new("active", "Active", "true"),
                    Tab::new("inactive", "Inactive", "false"),
                ],
            )
            .default_sort(SortSpec::asc("name"))
    }

    pub fn export_columns() -> ExportColumns {
        ExportColumns::new()
            .column("id", "ID")
            .column("name", "Name")
            .column("product_count", "Products")
            .column("active", "Active")
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    pub active: bool,
}

impl CategoryForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            active: true,
        }
    }

    pub fn for_edit(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            active: category.active,
        }
    }
}

impl FormModel for CategoryForm {
    fn normalize(&mut self) {
        self.name = filters::trim(&self.name);
    }

    fn to_payload(&self) -> Value {
        json!({ "name": self.name, "active": self.active })
    }
}
